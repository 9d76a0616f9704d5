//! Client commands and their encoding.
//!
//! [`Command::encode`] produces the request for one tag, CRLF included.
//! Arguments that cannot be quoted become literals, which split the
//! request into [`Request::parts`].

mod args;
mod request;
mod tags;

use std::fmt;

use crate::types::{Flag, Mailbox, SequenceSet};

pub use args::{FetchAttribute, FetchItems, SearchCriteria};
pub use request::Request;
pub use tags::TagGenerator;

use request::Encoder;

/// A request the client can send.
///
/// `Debug` never shows the LOGIN password.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// `CAPABILITY`
    Capability,
    /// `NOOP`
    Noop,
    /// `LOGOUT`
    Logout,
    /// `STARTTLS`
    StartTls,
    /// `LOGIN user password`
    Login {
        /// Account name.
        username: String,
        /// Plain-text password.
        password: String,
    },
    /// `SELECT mailbox`
    Select {
        /// Mailbox to open.
        mailbox: Mailbox,
    },
    /// `LIST reference pattern`
    List {
        /// Reference name, usually empty.
        reference: String,
        /// Pattern with `*` and `%` wildcards.
        pattern: String,
    },
    /// `SEARCH criteria`, by sequence number.
    Search(SearchCriteria),
    /// `FETCH set items`, by sequence number.
    Fetch {
        /// Messages to fetch.
        set: SequenceSet,
        /// Data items to return.
        items: FetchItems,
    },
    /// `STORE set +FLAGS (flags)`, by sequence number.
    AddFlags {
        /// Messages to change.
        set: SequenceSet,
        /// Flags to add.
        flags: Vec<Flag>,
    },
    /// `EXPUNGE`
    Expunge,
}

impl Command {
    /// The request for `tag`, CRLF included.
    #[must_use]
    pub fn encode(&self, tag: &str) -> Request {
        let mut out = Encoder::new(tag);
        out.raw(" ");
        out.raw(self.name());
        match self {
            Self::Login { username, password } => {
                out.raw(" ");
                out.astring(username);
                out.raw(" ");
                out.astring(password);
            }
            Self::Select { mailbox } => {
                out.raw(" ");
                out.astring(mailbox.as_str());
            }
            Self::List { reference, pattern } => {
                out.raw(" ");
                out.astring(reference);
                out.raw(" ");
                out.astring(pattern);
            }
            Self::Search(criteria) => {
                if !criteria.is_ascii() {
                    out.raw(" CHARSET UTF-8");
                }
                out.raw(" ");
                criteria.encode(&mut out);
            }
            Self::Fetch { set, items } => out.raw(&format!(" {set} {items}")),
            Self::AddFlags { set, flags } => {
                let flags: Vec<String> = flags.iter().map(ToString::to_string).collect();
                out.raw(&format!(" {set} +FLAGS ({})", flags.join(" ")));
            }
            Self::Capability | Self::Noop | Self::Logout | Self::StartTls | Self::Expunge => {}
        }
        out.finish()
    }

    /// Command keyword, for log lines.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Noop => "NOOP",
            Self::Logout => "LOGOUT",
            Self::StartTls => "STARTTLS",
            Self::Login { .. } => "LOGIN",
            Self::Select { .. } => "SELECT",
            Self::List { .. } => "LIST",
            Self::Search(_) => "SEARCH",
            Self::Fetch { .. } => "FETCH",
            Self::AddFlags { .. } => "STORE",
            Self::Expunge => "EXPUNGE",
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Select { mailbox } => f.debug_tuple("Select").field(mailbox).finish(),
            Self::List { reference, pattern } => {
                f.debug_tuple("List").field(reference).field(pattern).finish()
            }
            Self::Search(criteria) => f.debug_tuple("Search").field(criteria).finish(),
            Self::Fetch { set, items } => f.debug_tuple("Fetch").field(set).field(items).finish(),
            Self::AddFlags { set, flags } => {
                f.debug_tuple("AddFlags").field(set).field(flags).finish()
            }
            Self::Capability | Self::Noop | Self::Logout | Self::StartTls | Self::Expunge => {
                f.write_str(self.name())
            }
        }
    }
}
