//! CAPABILITY entries.

use std::fmt;

/// One advertised capability.
///
/// Only the ones that change client behavior get a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `IMAP4rev1`
    Imap4Rev1,
    /// `STARTTLS`
    StartTls,
    /// `LOGINDISABLED`: LOGIN is refused on this connection.
    LoginDisabled,
    /// `AUTH=<mechanism>`
    Auth(String),
    /// Anything else.
    Other(String),
}

impl From<&str> for Capability {
    fn from(word: &str) -> Self {
        if let Some(mechanism) = word
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("AUTH="))
            .and_then(|_| word.get(5..))
        {
            return Self::Auth(mechanism.to_string());
        }
        match word.to_ascii_uppercase().as_str() {
            "IMAP4REV1" => Self::Imap4Rev1,
            "STARTTLS" => Self::StartTls,
            "LOGINDISABLED" => Self::LoginDisabled,
            _ => Self::Other(word.to_string()),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imap4Rev1 => f.write_str("IMAP4rev1"),
            Self::StartTls => f.write_str("STARTTLS"),
            Self::LoginDisabled => f.write_str("LOGINDISABLED"),
            Self::Auth(mechanism) => write!(f, "AUTH={mechanism}"),
            Self::Other(word) => f.write_str(word),
        }
    }
}
