//! Command arguments and their wire forms.
//!
//! Fetch items are fixed ASCII and implement [`Display`] as their wire
//! form. Search keys carry user text and go through the request encoder.

use std::fmt::{self, Display, Write};

use chrono::NaiveDate;

use super::request::Encoder;

/// One data item named in a FETCH request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// `UID`
    Uid,
    /// `FLAGS`
    Flags,
    /// `ENVELOPE`
    Envelope,
    /// `RFC822.SIZE`
    Rfc822Size,
    /// `BODYSTRUCTURE`
    BodyStructure,
    /// `BODY.PEEK[section]`; reading it leaves `\Seen` alone.
    BodyPeek(String),
}

impl Display for FetchAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uid => f.write_str("UID"),
            Self::Flags => f.write_str("FLAGS"),
            Self::Envelope => f.write_str("ENVELOPE"),
            Self::Rfc822Size => f.write_str("RFC822.SIZE"),
            Self::BodyStructure => f.write_str("BODYSTRUCTURE"),
            Self::BodyPeek(section) => write!(f, "BODY.PEEK[{section}]"),
        }
    }
}

/// The item list of a FETCH request.
///
/// A lone item goes out bare, several go out parenthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItems(Vec<FetchAttribute>);

impl FetchItems {
    /// What a listing row needs: UID, flags, envelope and size.
    #[must_use]
    pub fn overview() -> Self {
        Self(vec![
            FetchAttribute::Uid,
            FetchAttribute::Flags,
            FetchAttribute::Envelope,
            FetchAttribute::Rfc822Size,
        ])
    }

    /// The body structure alone.
    #[must_use]
    pub fn structure() -> Self {
        Self(vec![FetchAttribute::BodyStructure])
    }

    /// One body section, peeked.
    #[must_use]
    pub fn section(section: impl Into<String>) -> Self {
        Self(vec![FetchAttribute::BodyPeek(section.into())])
    }

    /// The requested attributes in request order.
    #[must_use]
    pub fn attributes(&self) -> &[FetchAttribute] {
        &self.0
    }
}

impl From<Vec<FetchAttribute>> for FetchItems {
    fn from(attributes: Vec<FetchAttribute>) -> Self {
        Self(attributes)
    }
}

impl Display for FetchItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.0.as_slice() {
            return only.fmt(f);
        }
        f.write_char('(')?;
        for (i, attribute) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            attribute.fmt(f)?;
        }
        f.write_char(')')
    }
}

/// A SEARCH key, or a conjunction of keys.
///
/// Text terms are never sent bare: they are quoted, or sent as literals
/// when they hold line breaks or 8-bit text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// Every message.
    All,
    /// Messages without `\Seen`.
    Unseen,
    /// Header or body contains the term.
    Text(String),
    /// Subject contains the term.
    Subject(String),
    /// From contains the term.
    From(String),
    /// To contains the term.
    To(String),
    /// Cc contains the term.
    Cc(String),
    /// Bcc contains the term.
    Bcc(String),
    /// Body contains the term.
    Body(String),
    /// Internal date on or after the day.
    Since(NaiveDate),
    /// Internal date before the day.
    Before(NaiveDate),
    /// Every key must match.
    And(Vec<Self>),
}

impl SearchCriteria {
    /// Appends `other` to the conjunction, starting one if needed.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut keys = match self {
            Self::And(keys) => keys,
            single => vec![single],
        };
        keys.push(other);
        Self::And(keys)
    }
}

impl SearchCriteria {
    /// Whether every term is plain ASCII. Anything else needs
    /// `CHARSET UTF-8`.
    #[must_use]
    pub fn is_ascii(&self) -> bool {
        match self {
            Self::All | Self::Unseen | Self::Since(_) | Self::Before(_) => true,
            Self::And(keys) => keys.iter().all(Self::is_ascii),
            Self::Text(term)
            | Self::Subject(term)
            | Self::From(term)
            | Self::To(term)
            | Self::Cc(term)
            | Self::Bcc(term)
            | Self::Body(term) => term.is_ascii(),
        }
    }

    pub(super) fn encode(&self, out: &mut Encoder) {
        let (key, term) = match self {
            Self::All => return out.raw("ALL"),
            Self::Unseen => return out.raw("UNSEEN"),
            Self::Since(day) => return out.raw(&format!("SINCE {}", SearchDate(*day))),
            Self::Before(day) => return out.raw(&format!("BEFORE {}", SearchDate(*day))),
            Self::And(keys) => {
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        out.raw(" ");
                    }
                    key.encode(out);
                }
                return;
            }
            Self::Text(term) => ("TEXT", term),
            Self::Subject(term) => ("SUBJECT", term),
            Self::From(term) => ("FROM", term),
            Self::To(term) => ("TO", term),
            Self::Cc(term) => ("CC", term),
            Self::Bcc(term) => ("BCC", term),
            Self::Body(term) => ("BODY", term),
        };
        out.raw(key);
        out.raw(" ");
        out.string(term);
    }
}

/// `5-Jan-2024`
struct SearchDate(NaiveDate);

impl Display for SearchDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%-d-%b-%Y"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn keys(criteria: &SearchCriteria) -> String {
        let mut out = Encoder::new("SEARCH ");
        criteria.encode(&mut out);
        String::from_utf8(out.finish().to_bytes()).unwrap()
    }

    #[test]
    fn fetch_item_lists() {
        assert_eq!(
            FetchItems::overview().to_string(),
            "(UID FLAGS ENVELOPE RFC822.SIZE)"
        );
        assert_eq!(FetchItems::structure().to_string(), "BODYSTRUCTURE");
        assert_eq!(FetchItems::section("1.2").to_string(), "BODY.PEEK[1.2]");

        let items = FetchItems::from(vec![FetchAttribute::Uid, FetchAttribute::BodyPeek("HEADER".into())]);
        assert_eq!(items.to_string(), "(UID BODY.PEEK[HEADER])");
        assert_eq!(items.attributes().len(), 2);
    }

    #[test]
    fn search_dates_are_not_zero_padded() {
        assert_eq!(keys(&SearchCriteria::Since(day(2024, 1, 5))), "SEARCH SINCE 5-Jan-2024\r\n");
        assert_eq!(keys(&SearchCriteria::Before(day(2023, 12, 25))), "SEARCH BEFORE 25-Dec-2023\r\n");
    }

    #[test]
    fn text_terms_are_always_quoted() {
        assert_eq!(keys(&SearchCriteria::Body("x".into())), "SEARCH BODY \"x\"\r\n");
        assert_eq!(keys(&SearchCriteria::Cc("a b".into())), "SEARCH CC \"a b\"\r\n");
    }

    #[test]
    fn conjunctions_flatten() {
        let criteria = SearchCriteria::Subject("invoice".into())
            .and(SearchCriteria::Since(day(2024, 2, 1)))
            .and(SearchCriteria::Unseen);
        let SearchCriteria::And(parts) = &criteria else {
            panic!("expected a conjunction");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(keys(&criteria), "SEARCH SUBJECT \"invoice\" SINCE 1-Feb-2024 UNSEEN\r\n");
    }

    #[test]
    fn non_ascii_terms_are_flagged() {
        assert!(SearchCriteria::Subject("invoice".into()).and(SearchCriteria::Unseen).is_ascii());
        let criteria = SearchCriteria::Unseen.and(SearchCriteria::Subject("café".into()));
        assert!(!criteria.is_ascii());
        assert_eq!(keys(&criteria), "SEARCH UNSEEN SUBJECT {5}\r\ncafé\r\n");
    }
}
