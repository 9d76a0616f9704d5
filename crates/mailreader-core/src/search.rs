//! Search requests and result paging.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use mailreader_imap::{SearchCriteria, SeqNum};

use crate::error::ConfigError;

/// Which part of a message a text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    /// Headers and body.
    #[default]
    Text,
    /// Subject header.
    Subject,
    /// From header.
    From,
    /// To header.
    To,
    /// Cc header.
    Cc,
    /// Bcc header.
    Bcc,
    /// Body only.
    Body,
}

impl SearchField {
    /// The SEARCH key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Subject => "SUBJECT",
            Self::From => "FROM",
            Self::To => "TO",
            Self::Cc => "CC",
            Self::Bcc => "BCC",
            Self::Body => "BODY",
        }
    }

    fn criteria(self, term: String) -> SearchCriteria {
        match self {
            Self::Text => SearchCriteria::Text(term),
            Self::Subject => SearchCriteria::Subject(term),
            Self::From => SearchCriteria::From(term),
            Self::To => SearchCriteria::To(term),
            Self::Cc => SearchCriteria::Cc(term),
            Self::Bcc => SearchCriteria::Bcc(term),
            Self::Body => SearchCriteria::Body(term),
        }
    }
}

impl FromStr for SearchField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEXT" => Ok(Self::Text),
            "SUBJECT" => Ok(Self::Subject),
            "FROM" => Ok(Self::From),
            "TO" => Ok(Self::To),
            "CC" => Ok(Self::Cc),
            "BCC" => Ok(Self::Bcc),
            "BODY" => Ok(Self::Body),
            _ => Err(ConfigError::UnknownSearchField(s.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text search with optional filters and paging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// Field to match.
    pub field: SearchField,
    /// Search term, always sent quoted.
    pub term: String,
    /// Restrict to messages without `\Seen`.
    pub unread_only: bool,
    /// Page size; `None` returns everything after `offset`.
    pub limit: Option<usize>,
    /// Number of newest matches to skip.
    pub offset: usize,
    /// Internal date on or after this day.
    pub since: Option<NaiveDate>,
    /// Internal date before this day.
    pub before: Option<NaiveDate>,
}

impl SearchQuery {
    /// Searches `term` in headers and body.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Sets the field.
    #[must_use]
    pub const fn field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    /// Restricts to unread messages.
    #[must_use]
    pub const fn unread_only(mut self, unread_only: bool) -> Self {
        self.unread_only = unread_only;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of matches to skip.
    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Adds a `SINCE` bound.
    #[must_use]
    pub const fn since(mut self, day: NaiveDate) -> Self {
        self.since = Some(day);
        self
    }

    /// Adds a `BEFORE` bound.
    #[must_use]
    pub const fn before(mut self, day: NaiveDate) -> Self {
        self.before = Some(day);
        self
    }

    /// SEARCH criteria: `<FIELD> "<term>" [SINCE d] [BEFORE d] [UNSEEN]`.
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        let mut criteria = self.field.criteria(self.term.clone());
        if let Some(day) = self.since {
            criteria = criteria.and(SearchCriteria::Since(day));
        }
        if let Some(day) = self.before {
            criteria = criteria.and(SearchCriteria::Before(day));
        }
        if self.unread_only {
            criteria = criteria.and(SearchCriteria::Unseen);
        }
        criteria
    }

    /// Applies this query's paging to a result list.
    #[must_use]
    pub fn paginate(&self, ids: Vec<SeqNum>) -> Vec<SeqNum> {
        paginate(ids, self.limit, self.offset)
    }
}

/// `SINCE d [BEFORE d] [UNSEEN]`.
#[must_use]
pub fn date_criteria(since: NaiveDate, before: Option<NaiveDate>, unread_only: bool) -> SearchCriteria {
    let mut criteria = SearchCriteria::Since(since);
    if let Some(day) = before {
        criteria = criteria.and(SearchCriteria::Before(day));
    }
    if unread_only {
        criteria = criteria.and(SearchCriteria::Unseen);
    }
    criteria
}

/// `ALL`, or `UNSEEN` when unread only.
#[must_use]
pub const fn listing_criteria(unread_only: bool) -> SearchCriteria {
    if unread_only {
        SearchCriteria::Unseen
    } else {
        SearchCriteria::All
    }
}

/// Sorts newest first, then skips `offset` and keeps at most `limit`.
#[must_use]
pub fn paginate(mut ids: Vec<SeqNum>, limit: Option<usize>, offset: usize) -> Vec<SeqNum> {
    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids.dedup();
    ids.into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
