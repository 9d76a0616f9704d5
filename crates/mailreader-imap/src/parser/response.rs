//! Top-level response grammar: tagged completions, untagged data and
//! continuation requests.

use super::body;
use super::reader::Reader;
use super::types::UntaggedResponse;
use crate::types::{
    Capability, Flag, Flags, ListResponse, Mailbox, MailboxAttribute, ResponseCode, SeqNum,
    Status, Tag, Uid, UidValidity,
};
use crate::Result;

/// A parsed IMAP response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Completion of the command carrying `tag`.
    Tagged {
        /// The command tag.
        tag: Tag,
        /// Completion status.
        status: Status,
        /// Bracketed response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// Server data.
    Untagged(UntaggedResponse),
    /// `+` request for more client data.
    Continuation {
        /// Text after the `+`, if any.
        text: Option<String>,
    },
}

/// Parses single responses as framed by the connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one complete response: a line plus any literals it embeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) when the bytes do not form a response.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut r = Reader::new(input);
        match r.peek() {
            Some(b'*') => {
                r.advance();
                r.sp()?;
                untagged(&mut r).map(Response::Untagged)
            }
            Some(b'+') => {
                r.advance();
                r.eat(b' ');
                let text = r.rest_of_line();
                Ok(Response::Continuation {
                    text: (!text.is_empty()).then_some(text),
                })
            }
            Some(_) => tagged(&mut r),
            None => Err(r.fail("empty response")),
        }
    }
}

fn tagged(r: &mut Reader<'_>) -> Result<Response> {
    let tag = Tag::new(r.atom()?);
    r.sp()?;
    let status = status(r)?;
    let (code, text) = resp_text(r)?;
    Ok(Response::Tagged {
        tag,
        status,
        code,
        text,
    })
}

fn status(r: &mut Reader<'_>) -> Result<Status> {
    let word = r.atom()?;
    Status::from_keyword(word).ok_or_else(|| r.fail(format!("unknown status {word}")))
}

fn untagged(r: &mut Reader<'_>) -> Result<UntaggedResponse> {
    if r.peek().is_some_and(|b| b.is_ascii_digit()) {
        return message_data(r);
    }

    let keyword = r.atom()?;
    if let Some(status) = Status::from_keyword(keyword) {
        let (code, text) = resp_text(r)?;
        return Ok(UntaggedResponse::Status { status, code, text });
    }

    let keyword = keyword.to_ascii_uppercase();
    let data = match keyword.as_str() {
        "CAPABILITY" => UntaggedResponse::Capability(capabilities(r)?),
        "FLAGS" => {
            r.sp()?;
            UntaggedResponse::Flags(flag_list(r)?)
        }
        "LIST" => {
            r.sp()?;
            UntaggedResponse::List(mailbox_list(r)?)
        }
        "SEARCH" => UntaggedResponse::Search(search_ids(r)?),
        _ => UntaggedResponse::Other(keyword),
    };
    Ok(data)
}

/// `n EXISTS`, `n RECENT`, `n EXPUNGE` and `n FETCH (...)`.
fn message_data(r: &mut Reader<'_>) -> Result<UntaggedResponse> {
    let n = r.number()?;
    r.sp()?;
    let keyword = r.atom()?.to_ascii_uppercase();
    let data = match keyword.as_str() {
        "EXISTS" => UntaggedResponse::Exists(n),
        "RECENT" => UntaggedResponse::Recent(n),
        "EXPUNGE" => UntaggedResponse::Expunge(seq_num(r, n)?),
        "FETCH" => {
            let seq = seq_num(r, n)?;
            r.sp()?;
            UntaggedResponse::Fetch {
                seq,
                items: body::msg_att(r)?,
            }
        }
        _ => UntaggedResponse::Other(keyword),
    };
    Ok(data)
}

fn seq_num(r: &Reader<'_>, n: u32) -> Result<SeqNum> {
    SeqNum::new(n).ok_or_else(|| r.fail("sequence number 0"))
}

/// Reads a non-zero number into one of the identifier types.
pub(super) fn nonzero<T>(
    r: &mut Reader<'_>,
    what: &str,
    make: impl FnOnce(u32) -> Option<T>,
) -> Result<T> {
    let n = r.number()?;
    make(n).ok_or_else(|| r.fail(format!("{what} cannot be 0")))
}

/// `[SP] ["[" code "]" [SP]] text`. Some servers omit the text entirely.
fn resp_text(r: &mut Reader<'_>) -> Result<(Option<ResponseCode>, String)> {
    r.eat(b' ');
    let code = if r.peek() == Some(b'[') {
        let code = resp_code(r)?;
        r.eat(b' ');
        Some(code)
    } else {
        None
    };
    Ok((code, r.rest_of_line()))
}

fn resp_code(r: &mut Reader<'_>) -> Result<ResponseCode> {
    r.byte(b'[')?;
    let name = r.atom()?;
    let code = match name.to_ascii_uppercase().as_str() {
        "ALERT" => ResponseCode::Alert,
        "READ-ONLY" => ResponseCode::ReadOnly,
        "READ-WRITE" => ResponseCode::ReadWrite,
        "TRYCREATE" => ResponseCode::TryCreate,
        "AUTHENTICATIONFAILED" => ResponseCode::AuthenticationFailed,
        "UIDNEXT" => {
            r.sp()?;
            ResponseCode::UidNext(nonzero(r, "UIDNEXT", Uid::new)?)
        }
        "UIDVALIDITY" => {
            r.sp()?;
            ResponseCode::UidValidity(nonzero(r, "UIDVALIDITY", UidValidity::new)?)
        }
        "UNSEEN" => {
            r.sp()?;
            ResponseCode::Unseen(nonzero(r, "UNSEEN", SeqNum::new)?)
        }
        "CAPABILITY" => ResponseCode::Capability(capabilities(r)?),
        "PERMANENTFLAGS" => {
            r.sp()?;
            ResponseCode::PermanentFlags(flag_list(r)?.into_iter().collect())
        }
        _ => ResponseCode::Other(name.to_string()),
    };

    // arguments of codes we do not interpret
    r.take_until(b']')
        .ok_or_else(|| r.fail("unterminated response code"))?;
    r.byte(b']')?;
    Ok(code)
}

fn capabilities(r: &mut Reader<'_>) -> Result<Vec<Capability>> {
    let mut caps = Vec::new();
    while r.eat(b' ') {
        match r.peek() {
            Some(b'\r' | b'\n' | b']') | None => break,
            Some(_) => caps.push(Capability::from(r.atom()?)),
        }
    }
    Ok(caps)
}

pub(super) fn flag_list(r: &mut Reader<'_>) -> Result<Flags> {
    let mut flags = Flags::new();
    for word in words(r)? {
        flags.insert(Flag::from(word));
    }
    Ok(flags)
}

/// A parenthesized, space-separated list of flags or attributes.
fn words<'a>(r: &mut Reader<'a>) -> Result<Vec<&'a str>> {
    r.byte(b'(')?;
    let mut words = Vec::new();
    loop {
        match r.peek() {
            Some(b')') => {
                r.advance();
                return Ok(words);
            }
            Some(b' ') => r.advance(),
            Some(_) => words.push(r.flag()?),
            None => return Err(r.fail("unterminated list")),
        }
    }
}

/// `(attributes) delimiter name`.
fn mailbox_list(r: &mut Reader<'_>) -> Result<ListResponse> {
    let attributes = words(r)?
        .into_iter()
        .map(MailboxAttribute::from)
        .collect();
    r.sp()?;
    let delimiter = if r.nil() {
        None
    } else {
        String::from_utf8_lossy(&r.string()?).chars().next()
    };
    r.sp()?;
    let name = r.astring()?;

    Ok(ListResponse {
        attributes,
        delimiter,
        mailbox: Mailbox::new(name),
    })
}

/// Numbers after `SEARCH`; anything else (a trailing `(MODSEQ n)`) is skipped.
fn search_ids(r: &mut Reader<'_>) -> Result<Vec<SeqNum>> {
    let mut ids = Vec::new();
    while r.eat(b' ') {
        match r.peek() {
            Some(b) if b.is_ascii_digit() => {
                if let Some(id) = SeqNum::new(r.number()?) {
                    ids.push(id);
                }
            }
            Some(b'\r' | b'\n') | None => break,
            Some(_) => r.skip_value()?,
        }
    }
    Ok(ids)
}
