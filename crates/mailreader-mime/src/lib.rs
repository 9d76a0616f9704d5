//! # mailreader-mime
//!
//! MIME structure model and decoding for the mail reader.
//!
//! - [`MimeNode`]: the body-part tree of a message, with dotted part numbers
//! - [`MediaType`] and [`TransferEncoding`] with stable numeric codes
//! - body lookup ([`MimeNode::find_body`]) and attachment classification
//!   ([`collect_attachments`])
//! - base64 and quoted-printable transfer decoding
//! - RFC 2047 encoded words, RFC 2231 parameters and charset conversion
//!
//! ## Example
//!
//! ```
//! use mailreader_mime::{MediaType, MimeNode, collect_attachments};
//!
//! let mut root = MimeNode {
//!     children: vec![
//!         MimeNode::new(MediaType::Text, "PLAIN"),
//!         MimeNode {
//!             parameters: vec![("NAME".into(), "invoice.pdf".into())],
//!             ..MimeNode::new(MediaType::Application, "PDF")
//!         },
//!     ],
//!     ..MimeNode::new(MediaType::Multipart, "MIXED")
//! };
//! root.assign_part_numbers();
//!
//! let body = root.find_body("text/plain").unwrap();
//! assert_eq!(body.part_number, "1");
//!
//! let attachments = collect_attachments(&root);
//! assert_eq!(attachments[0].filename, "invoice.pdf");
//! assert_eq!(attachments[0].node.part_number, "2");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod media;
mod node;

pub mod charset;
pub mod encoding;
pub mod header;

pub use charset::decode_to_utf8;
pub use error::{Error, Result};
pub use header::{decode_header, decode_param};
pub use media::{MediaType, TransferEncoding};
pub use node::{AttachmentPart, MimeNode, collect_attachments};
