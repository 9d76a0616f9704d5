//! Byte cursor over one complete server response.
//!
//! Each method consumes one production of the response grammar (atom,
//! number, string, ...) or fails without a partial result. Positions in
//! errors are byte offsets into the response.

use crate::{Error, Result};

/// Cursor over a response line and its embedded literals.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    at: usize,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, at: 0 }
    }

    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.at).copied()
    }

    fn rest(&self) -> &'a [u8] {
        self.buf.get(self.at..).unwrap_or_default()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.at += 1;
        Some(byte)
    }

    /// Steps over the current byte, if any.
    pub fn advance(&mut self) {
        if self.at < self.buf.len() {
            self.at += 1;
        }
    }

    /// Consumes `byte` if it is next.
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.at += 1;
            true
        } else {
            false
        }
    }

    /// Requires `byte` next.
    pub fn byte(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.fail(format!("expected {:?}", char::from(byte))))
        }
    }

    pub fn sp(&mut self) -> Result<()> {
        self.byte(b' ')
    }

    pub fn fail(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            position: self.at,
            message: message.into(),
        }
    }

    fn take_while(&mut self, keep: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.at;
        while self.peek().is_some_and(&keep) {
            self.at += 1;
        }
        &self.buf[start..self.at]
    }

    /// Bytes up to, not including, `end`. Nothing is consumed when `end`
    /// never appears.
    pub fn take_until(&mut self, end: u8) -> Option<&'a [u8]> {
        let rest = self.rest();
        let len = rest.iter().position(|&b| b == end)?;
        self.at += len;
        Some(&rest[..len])
    }

    pub fn atom(&mut self) -> Result<&'a str> {
        let raw = self.take_while(is_atom_char);
        if raw.is_empty() {
            return Err(self.fail("expected atom"));
        }
        std::str::from_utf8(raw).map_err(|_| self.fail("atom is not ASCII"))
    }

    /// A flag or mailbox attribute. `\*` is accepted as a whole.
    pub fn flag(&mut self) -> Result<&'a str> {
        if self.rest().starts_with(b"\\*") {
            self.at += 2;
            return Ok("\\*");
        }
        self.atom()
    }

    pub fn number(&mut self) -> Result<u32> {
        let digits = self.take_while(|b| b.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.fail("expected number"));
        }
        std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| self.fail("number out of range"))
    }

    /// Consumes `NIL` in any case.
    pub fn nil(&mut self) -> bool {
        let rest = self.rest();
        let is_nil = rest.get(..3).is_some_and(|w| w.eq_ignore_ascii_case(b"NIL"))
            && !rest.get(3).copied().is_some_and(is_atom_char);
        if is_nil {
            self.at += 3;
        }
        is_nil
    }

    /// A quoted string or a literal.
    pub fn string(&mut self) -> Result<Vec<u8>> {
        match self.peek() {
            Some(b'"') => self.quoted(),
            Some(b'{') => self.literal(),
            _ => Err(self.fail("expected string")),
        }
    }

    pub fn nstring(&mut self) -> Result<Option<Vec<u8>>> {
        if self.nil() {
            Ok(None)
        } else {
            self.string().map(Some)
        }
    }

    /// [`nstring`](Self::nstring) as text. Invalid UTF-8 is replaced.
    pub fn nstring_text(&mut self) -> Result<Option<String>> {
        Ok(self.nstring()?.map(into_text))
    }

    /// An atom-like word, which may also contain brackets, or a string.
    pub fn astring(&mut self) -> Result<String> {
        if matches!(self.peek(), Some(b'"' | b'{')) {
            return self.string().map(into_text);
        }
        let raw = self.take_while(|b| is_atom_char(b) || b == b'[' || b == b']');
        if raw.is_empty() {
            return Err(self.fail("expected astring"));
        }
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Everything up to the line end; the CRLF itself is consumed.
    pub fn rest_of_line(&mut self) -> String {
        let line = self.take_while(|b| b != b'\r' && b != b'\n');
        self.eat(b'\r');
        self.eat(b'\n');
        String::from_utf8_lossy(line).into_owned()
    }

    /// Steps over one value of any shape: a parenthesized list, a string,
    /// or an atom with optional `[...]` sections.
    pub fn skip_value(&mut self) -> Result<()> {
        match self.peek() {
            Some(b'(') => {
                self.advance();
                self.close_list()
            }
            Some(b'"' | b'{') => self.string().map(drop),
            Some(b) if is_atom_char(b) || b == b'[' => {
                while let Some(b) = self.peek() {
                    if b == b'[' {
                        self.take_until(b']')
                            .ok_or_else(|| self.fail("unterminated section"))?;
                        self.advance();
                    } else if is_atom_char(b) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                Ok(())
            }
            Some(b) => Err(self.fail(format!("unexpected byte {b:#04x}"))),
            None => Err(self.fail("unexpected end of response")),
        }
    }

    /// Skips whatever is left of the current list, including its `)`.
    pub fn close_list(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b')') => {
                    self.advance();
                    return Ok(());
                }
                Some(b' ') => self.advance(),
                Some(_) => self.skip_value()?,
                None => return Err(self.fail("unbalanced parentheses")),
            }
        }
    }

    fn quoted(&mut self) -> Result<Vec<u8>> {
        self.advance();
        let mut out = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'"') => return Ok(out),
                Some(b'\\') => match self.next_byte() {
                    Some(c @ (b'"' | b'\\')) => out.push(c),
                    _ => return Err(self.fail("invalid escape in quoted string")),
                },
                Some(b'\r' | b'\n') | None => {
                    return Err(self.fail("unterminated quoted string"));
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn literal(&mut self) -> Result<Vec<u8>> {
        self.advance();
        let announced = self.number()?;
        self.eat(b'+');
        self.byte(b'}')?;
        if !self.rest().starts_with(b"\r\n") {
            return Err(self.fail("expected CRLF after literal length"));
        }
        self.at += 2;

        let len = usize::try_from(announced).map_err(|_| self.fail("literal too large"))?;
        let data = self
            .rest()
            .get(..len)
            .ok_or_else(|| self.fail("literal shorter than announced"))?;
        self.at += len;
        Ok(data.to_vec())
    }
}

fn into_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Bytes allowed in an atom.
///
/// `\` is included so system flags read as one atom. `[` and `]` are
/// excluded so `BODY[TEXT]` and response codes split where they should.
#[must_use]
pub const fn is_atom_char(b: u8) -> bool {
    matches!(b, 0x21..=0x7e) && !matches!(b, b'(' | b')' | b'{' | b'%' | b'*' | b'"' | b'[' | b']')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn atoms_stop_at_specials() {
        let mut r = Reader::new(b"BODY[TEXT]");
        assert_eq!(r.atom().unwrap(), "BODY");
        assert_eq!(r.peek(), Some(b'['));

        let mut r = Reader::new(b"\\Seen)");
        assert_eq!(r.atom().unwrap(), "\\Seen");
        assert!(r.eat(b')'));
    }

    #[test]
    fn wildcard_flag() {
        let mut r = Reader::new(b"\\* rest");
        assert_eq!(r.flag().unwrap(), "\\*");
        assert_eq!(r.peek(), Some(b' '));
    }

    #[test]
    fn numbers() {
        assert_eq!(Reader::new(b"4294967295").number().unwrap(), u32::MAX);
        assert!(Reader::new(b"4294967296").number().is_err());
        assert!(Reader::new(b"x").number().is_err());
    }

    #[test]
    fn nil_needs_a_word_boundary() {
        let mut r = Reader::new(b"nil ");
        assert!(r.nil());

        let mut r = Reader::new(b"NILS");
        assert!(!r.nil());
        assert_eq!(r.atom().unwrap(), "NILS");
    }

    #[test]
    fn quoted_string_escapes() {
        let mut r = Reader::new(br#""say \"hi\" \\ bye" tail"#);
        assert_eq!(r.string().unwrap(), br#"say "hi" \ bye"#);
        assert!(Reader::new(br#""bad \n""#).string().is_err());
        assert!(Reader::new(b"\"open").string().is_err());
    }

    #[test]
    fn literal_reads_exact_length() {
        let mut r = Reader::new(b"{5}\r\nhello world");
        assert_eq!(r.string().unwrap(), b"hello");
        assert_eq!(r.peek(), Some(b' '));

        let mut r = Reader::new(b"{3+}\r\n\xff\x00\r");
        assert_eq!(r.string().unwrap(), vec![0xff, 0x00, b'\r']);
    }

    #[test]
    fn short_or_huge_literal_is_error() {
        assert!(Reader::new(b"{10}\r\nabc").string().is_err());
        assert!(Reader::new(b"{4294967295}\r\nabc").string().is_err());
        assert!(Reader::new(b"{2}abc").string().is_err());
    }

    #[test]
    fn nstring_text_is_lossy() {
        let mut r = Reader::new(b"{2}\r\n\xe9t");
        assert_eq!(r.nstring_text().unwrap().unwrap(), "\u{fffd}t");
    }

    #[test]
    fn astring_allows_brackets() {
        let mut r = Reader::new(b"[Gmail]/Sent\r\n");
        assert_eq!(r.astring().unwrap(), "[Gmail]/Sent");

        let mut r = Reader::new(b"\"Sent Items\" x");
        assert_eq!(r.astring().unwrap(), "Sent Items");
        assert!(Reader::new(b" x").astring().is_err());
    }

    #[test]
    fn rest_of_line_consumes_crlf() {
        let mut r = Reader::new(b"LOGIN done\r\nnext");
        assert_eq!(r.rest_of_line(), "LOGIN done");
        assert_eq!(r.atom().unwrap(), "next");
    }

    #[test]
    fn skip_nested_values() {
        let mut r = Reader::new(b"(a (b \"c)\") {1}\r\n) NIL) UID");
        r.skip_value().unwrap();
        assert!(r.eat(b' '));
        assert_eq!(r.atom().unwrap(), "UID");

        let mut r = Reader::new(b"BINARY[1]<0> x");
        r.skip_value().unwrap();
        assert!(r.eat(b' '));
    }

    #[test]
    fn skip_unbalanced_is_error() {
        assert!(Reader::new(b"(a (b)").skip_value().is_err());
        assert!(Reader::new(b"\r\n").skip_value().is_err());
    }
}
