//! Values shared by the parser, the command encoder and the client.

mod capability;
mod flags;
mod identifiers;
mod mailbox;
mod sequence;
mod status;

pub use capability::Capability;
pub use flags::{Flag, Flags};
pub use identifiers::{SeqNum, Tag, Uid, UidValidity};
pub use mailbox::{ListResponse, Mailbox, MailboxAttribute, MailboxStatus};
pub use sequence::SequenceSet;
pub use status::{ResponseCode, Status};
