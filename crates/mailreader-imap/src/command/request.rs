//! Encoded requests and the string forms arguments take on the wire.
//!
//! An argument goes out as an atom when it is a plain word, quoted when it
//! is printable ASCII, and as a synchronizing literal when it carries CR,
//! LF, NUL or any 8-bit byte. A literal splits the request: the server must
//! answer `+` before the bytes after `{n}\r\n` may be sent.

/// A command ready to send, split at each literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    parts: Vec<Vec<u8>>,
}

impl Request {
    /// The pieces in send order. Every piece but the last ends in a
    /// `{n}\r\n` literal announcement.
    #[must_use]
    pub fn parts(&self) -> &[Vec<u8>] {
        &self.parts
    }

    /// Number of literals, i.e. continuations the server must grant.
    #[must_use]
    pub fn literals(&self) -> usize {
        self.parts.len().saturating_sub(1)
    }

    /// All pieces joined, as the server ends up receiving them.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.parts.concat()
    }
}

/// Builds a [`Request`] piece by piece.
pub(super) struct Encoder {
    parts: Vec<Vec<u8>>,
    line: Vec<u8>,
}

impl Encoder {
    pub(super) fn new(tag: &str) -> Self {
        let mut line = Vec::with_capacity(64);
        line.extend_from_slice(tag.as_bytes());
        Self {
            parts: Vec::new(),
            line,
        }
    }

    /// Protocol text the encoder controls: keywords, numbers, lists.
    pub(super) fn raw(&mut self, text: &str) {
        self.line.extend_from_slice(text.as_bytes());
    }

    /// An astring: bare when it is a plain word.
    pub(super) fn astring(&mut self, value: &str) {
        if !value.is_empty() && value.bytes().all(is_atom_char) {
            self.raw(value);
        } else {
            self.string(value);
        }
    }

    /// A string: quoted, or a literal when quoting cannot carry it.
    pub(super) fn string(&mut self, value: &str) {
        if value.bytes().any(needs_literal) {
            self.literal(value.as_bytes());
        } else {
            self.quoted(value);
        }
    }

    fn quoted(&mut self, value: &str) {
        self.line.push(b'"');
        for b in value.bytes() {
            if matches!(b, b'"' | b'\\') {
                self.line.push(b'\\');
            }
            self.line.push(b);
        }
        self.line.push(b'"');
    }

    fn literal(&mut self, bytes: &[u8]) {
        self.raw(&format!("{{{}}}\r\n", bytes.len()));
        self.parts.push(std::mem::take(&mut self.line));
        self.line.extend_from_slice(bytes);
    }

    pub(super) fn finish(mut self) -> Request {
        self.line.extend_from_slice(b"\r\n");
        self.parts.push(self.line);
        Request { parts: self.parts }
    }
}

const fn is_atom_char(b: u8) -> bool {
    matches!(b, 0x21..=0x7e) && !matches!(b, b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*')
}

/// Bytes a quoted string may not hold.
const fn needs_literal(b: u8) -> bool {
    matches!(b, b'\r' | b'\n' | 0) || !b.is_ascii()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    fn astring(value: &str) -> Vec<Vec<u8>> {
        let mut out = Encoder::new("T");
        out.raw(" ");
        out.astring(value);
        out.finish().parts
    }

    #[test]
    fn astring_quotes_only_when_needed() {
        assert_eq!(astring("INBOX"), [b"T INBOX\r\n".to_vec()]);
        assert_eq!(astring("[Gmail]/Sent"), [b"T [Gmail]/Sent\r\n".to_vec()]);
        assert_eq!(astring(""), [b"T \"\"\r\n".to_vec()]);
        assert_eq!(astring("*"), [b"T \"*\"\r\n".to_vec()]);
        assert_eq!(astring("Sent Items"), [b"T \"Sent Items\"\r\n".to_vec()]);
    }

    #[test]
    fn quoted_escapes() {
        assert_eq!(astring(r#"a "b" \c"#), [b"T \"a \\\"b\\\" \\\\c\"\r\n".to_vec()]);
    }

    #[test]
    fn eight_bit_text_becomes_a_literal() {
        let parts = astring("Entwürfe");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], b"T {9}\r\n");
        assert_eq!(parts[1], "Entwürfe\r\n".as_bytes());
    }

    #[test]
    fn line_breaks_never_reach_the_command_line() {
        let mut out = Encoder::new("A1");
        out.raw(" SEARCH TEXT ");
        out.string("x\r\nA9 DELETE INBOX");
        let request = out.finish();
        assert_eq!(request.literals(), 1);
        assert_eq!(request.parts()[0], b"A1 SEARCH TEXT {18}\r\n");
        assert_eq!(request.parts()[1], b"x\r\nA9 DELETE INBOX\r\n");
    }

    #[test]
    fn nul_forces_a_literal() {
        assert_eq!(astring("a\0b").len(), 2);
    }

    #[test]
    fn joined_bytes_match_the_wire() {
        let mut out = Encoder::new("A1");
        out.raw(" LOGIN ");
        out.astring("alice");
        out.raw(" ");
        out.astring("pässword");
        assert_eq!(
            out.finish().to_bytes(),
            "A1 LOGIN alice {9}\r\npässword\r\n".as_bytes()
        );
    }
}
