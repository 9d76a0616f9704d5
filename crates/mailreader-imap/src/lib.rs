//! # mailreader-imap
//!
//! IMAP client plumbing for a mail reader: transport, framing, command
//! serialization, a sans-I/O response parser and a type-state client,
//! topped by a single-connection [`Session`].
//!
//! Only what a reader needs is implemented: LOGIN, STARTTLS, LIST, SELECT,
//! SEARCH, FETCH (including full BODYSTRUCTURE), STORE and EXPUNGE.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailreader_imap::{Config, FetchItems, NetworkConnector, SearchCriteria, SequenceSet, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> mailreader_imap::Result<()> {
//!     let server = Config::new("imap.example.com");
//!     let mut session = Session::new(NetworkConnector, SessionConfig::new(server, "alice", "secret"));
//!
//!     let status = session.connect("INBOX").await?;
//!     println!("{} messages", status.exists);
//!
//!     let unseen = session.search(SearchCriteria::Unseen).await?;
//!     if let Some(set) = SequenceSet::from_seq_nums(&unseen) {
//!         for (seq, items) in session.fetch(&set, FetchItems::overview()).await? {
//!             println!("{seq}: {items:?}");
//!         }
//!     }
//!
//!     session.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! NotAuthenticated ── starttls() ──→ NotAuthenticated
//!        │
//!     login()
//!        ▼
//!  Authenticated ── select() ──→ Selected ── select() ──→ Selected
//! ```
//!
//! ## Modules
//!
//! - [`command`]: command types and serialization
//! - [`connection`]: transport, framing, type-state client and session
//! - [`parser`]: sans-I/O response parser
//! - [`types`]: flags, mailboxes, sequence sets and other protocol values

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, FetchAttribute, FetchItems, Request, SearchCriteria, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, Connector, FramedStream, ImapStream,
    NetworkConnector, NotAuthenticated, Security, Selected, Session,
    SessionConfig,
};
pub use error::{Error, Result};
pub use parser::{
    Address, BodyFields, BodyStructure, ContentDisposition, Envelope, FetchItem, Response,
    ResponseParser, UntaggedResponse,
};
pub use types::{
    Capability, Flag, Flags, ListResponse, Mailbox, MailboxAttribute, MailboxStatus, ResponseCode,
    SeqNum, SequenceSet, Status, Tag, Uid, UidValidity,
};
