//! Message flags as reported in FLAGS data.

use std::fmt;

/// A system flag or a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `\Seen`
    Seen,
    /// `\Answered`
    Answered,
    /// `\Flagged`
    Flagged,
    /// `\Deleted`
    Deleted,
    /// `\Draft`
    Draft,
    /// `\Recent`
    Recent,
    /// `\*` in PERMANENTFLAGS.
    Wildcard,
    /// Anything else, spelled as received.
    Keyword(String),
}

const SYSTEM: [(Flag, &str); 7] = [
    (Flag::Seen, "\\Seen"),
    (Flag::Answered, "\\Answered"),
    (Flag::Flagged, "\\Flagged"),
    (Flag::Deleted, "\\Deleted"),
    (Flag::Draft, "\\Draft"),
    (Flag::Recent, "\\Recent"),
    (Flag::Wildcard, "\\*"),
];

impl Flag {
    /// Wire spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        if let Self::Keyword(word) = self {
            return word;
        }
        SYSTEM
            .iter()
            .find(|(flag, _)| flag == self)
            .map_or("", |(_, name)| name)
    }
}

/// System flags match case-insensitively.
impl From<&str> for Flag {
    fn from(word: &str) -> Self {
        SYSTEM
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(word))
            .map_or_else(|| Self::Keyword(word.to_string()), |(flag, _)| flag.clone())
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The flags of one message, in first-seen order and without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(Vec<Flag>);

impl Flags {
    /// No flags.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds `flag` unless already present.
    pub fn insert(&mut self, flag: Flag) {
        if !self.0.contains(&flag) {
            self.0.push(flag);
        }
    }

    /// Whether `flag` is set.
    #[must_use]
    pub fn contains(&self, flag: &Flag) -> bool {
        self.0.contains(flag)
    }

    /// `\Seen` is set.
    #[must_use]
    pub fn is_seen(&self) -> bool {
        self.contains(&Flag::Seen)
    }

    /// `\Answered` is set.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.contains(&Flag::Answered)
    }

    /// `\Flagged` is set.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.contains(&Flag::Flagged)
    }

    /// Flags in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Flag> {
        self.0.iter()
    }

    /// Number of distinct flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No flags at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Self::new();
        iter.into_iter().for_each(|flag| flags.insert(flag));
        flags
    }
}

impl IntoIterator for Flags {
    type Item = Flag;
    type IntoIter = std::vec::IntoIter<Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
