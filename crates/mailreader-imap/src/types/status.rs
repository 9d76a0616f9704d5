//! Completion status and bracketed response codes.

use super::{Capability, Flag, SeqNum, Uid, UidValidity};

/// The condition word of a status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `OK`
    Ok,
    /// `NO`: the command was understood but refused.
    No,
    /// `BAD`: the command was malformed.
    Bad,
    /// `PREAUTH` greeting; the connection starts authenticated.
    PreAuth,
    /// `BYE`: the server is closing the connection.
    Bye,
}

impl Status {
    /// Reads a condition word, ignoring case.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        [
            ("OK", Self::Ok),
            ("NO", Self::No),
            ("BAD", Self::Bad),
            ("PREAUTH", Self::PreAuth),
            ("BYE", Self::Bye),
        ]
        .into_iter()
        .find_map(|(name, status)| name.eq_ignore_ascii_case(word).then_some(status))
    }
}

/// A `[CODE args]` block in front of response text.
///
/// Codes the client never acts on keep only their name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// `ALERT`: the text must reach the user.
    Alert,
    /// `CAPABILITY ...`, sent unasked in a greeting or LOGIN completion.
    Capability(Vec<Capability>),
    /// `PERMANENTFLAGS (...)`
    PermanentFlags(Vec<Flag>),
    /// `READ-ONLY`
    ReadOnly,
    /// `READ-WRITE`
    ReadWrite,
    /// `TRYCREATE`
    TryCreate,
    /// `UIDNEXT n`
    UidNext(Uid),
    /// `UIDVALIDITY n`
    UidValidity(UidValidity),
    /// `UNSEEN n`
    Unseen(SeqNum),
    /// `AUTHENTICATIONFAILED`
    AuthenticationFailed,
    /// Any other code, name as received.
    Other(String),
}
