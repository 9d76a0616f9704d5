//! Mailbox names, LIST entries and SELECT results.

use std::fmt;

use super::{Flags, SeqNum, Uid, UidValidity};

/// A mailbox name exactly as the server spells it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox(pub String);

impl Mailbox {
    /// Wraps a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What SELECT reported about the mailbox it opened.
///
/// Fields the server did not send stay at their defaults.
#[derive(Debug, Clone, Default)]
pub struct MailboxStatus {
    /// `* n EXISTS`
    pub exists: u32,
    /// `* n RECENT`
    pub recent: u32,
    /// `[UNSEEN n]`, the first unseen message.
    pub unseen: Option<SeqNum>,
    /// `[UIDNEXT n]`
    pub uid_next: Option<Uid>,
    /// `[UIDVALIDITY n]`
    pub uid_validity: Option<UidValidity>,
    /// `* FLAGS (...)`
    pub flags: Flags,
    /// Set by `[READ-ONLY]`.
    pub read_only: bool,
}

/// One `* LIST` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    /// Name attributes such as `\Noselect`.
    pub attributes: Vec<MailboxAttribute>,
    /// Hierarchy separator; `None` for a flat namespace.
    pub delimiter: Option<char>,
    /// The mailbox.
    pub mailbox: Mailbox,
}

impl ListResponse {
    /// False for placeholder entries that SELECT would refuse.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self
            .attributes
            .iter()
            .any(|a| matches!(a, MailboxAttribute::NoSelect | MailboxAttribute::NonExistent))
    }
}

/// A name attribute from LIST.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MailboxAttribute {
    /// `\Noselect`
    NoSelect,
    /// `\NonExistent`
    NonExistent,
    /// `\HasChildren`
    HasChildren,
    /// `\HasNoChildren`
    HasNoChildren,
    /// Special-use and other attributes, spelled as received.
    Other(String),
}

impl From<&str> for MailboxAttribute {
    fn from(word: &str) -> Self {
        let known = [
            ("\\Noselect", Self::NoSelect),
            ("\\NonExistent", Self::NonExistent),
            ("\\HasChildren", Self::HasChildren),
            ("\\HasNoChildren", Self::HasNoChildren),
        ];
        known
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .map_or_else(|| Self::Other(word.to_string()), |(_, attribute)| attribute)
    }
}
