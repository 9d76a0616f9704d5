//! IMAP response parser.
//!
//! Sans-I/O: the connection frames one response (a line plus the literals
//! it announces) and [`ResponseParser`] turns it into a [`Response`].
//!
//! # Example
//!
//! ```
//! use mailreader_imap::parser::{Response, ResponseParser, UntaggedResponse};
//! use mailreader_imap::Status;
//!
//! let response = ResponseParser::parse(b"* OK IMAP4rev1 server ready\r\n").unwrap();
//!
//! match response {
//!     Response::Untagged(UntaggedResponse::Status { status, text, .. }) => {
//!         assert_eq!(status, Status::Ok);
//!         assert!(text.contains("IMAP4rev1"));
//!     }
//!     _ => panic!("Expected untagged OK"),
//! }
//! ```

mod body;
mod reader;
mod response;
mod types;

pub use response::{Response, ResponseParser};
pub use types::{
    Address, BodyFields, BodyStructure, ContentDisposition, Envelope, FetchItem, UntaggedResponse,
};
