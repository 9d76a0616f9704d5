//! Values produced by the response parser.

use crate::types::{Capability, Flags, ListResponse, ResponseCode, SeqNum, Status, Uid};

/// Untagged server data.
#[derive(Debug, Clone, PartialEq)]
pub enum UntaggedResponse {
    /// `* OK|NO|BAD|PREAUTH|BYE [code] text`
    Status {
        /// Condition word.
        status: Status,
        /// Bracketed code, if any.
        code: Option<ResponseCode>,
        /// Remaining text.
        text: String,
    },
    /// `* CAPABILITY ...`
    Capability(Vec<Capability>),
    /// `* LIST ...`
    List(ListResponse),
    /// `* FLAGS (...)`
    Flags(Flags),
    /// `* n EXISTS`
    Exists(u32),
    /// `* n RECENT`
    Recent(u32),
    /// `* n EXPUNGE`
    Expunge(SeqNum),
    /// `* n FETCH (...)`
    Fetch {
        /// Message the data belongs to.
        seq: SeqNum,
        /// Recognized items, in server order.
        items: Vec<FetchItem>,
    },
    /// `* SEARCH n...`; empty when nothing matched.
    Search(Vec<SeqNum>),
    /// Data this client ignores, kept as its keyword.
    Other(String),
}

/// One item of a FETCH response.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchItem {
    /// `UID n`
    Uid(Uid),
    /// `FLAGS (...)`
    Flags(Flags),
    /// `RFC822.SIZE n`
    Rfc822Size(u32),
    /// `ENVELOPE (...)`
    Envelope(Box<Envelope>),
    /// `BODYSTRUCTURE (...)`, or `BODY (...)` without a section.
    BodyStructure(BodyStructure),
    /// `BODY[section] data`. `RFC822.TEXT` arrives as section `TEXT`.
    Section {
        /// The part path, `TEXT`, ...; `None` for the whole message.
        section: Option<String>,
        /// Raw octets; `None` when the server sent `NIL`.
        data: Option<Vec<u8>>,
    },
}

/// Parsed ENVELOPE.
///
/// Strings are kept as sent, so subjects and names may still hold
/// RFC 2047 encoded words.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    /// `Date`
    pub date: Option<String>,
    /// `Subject`
    pub subject: Option<String>,
    /// `From`
    pub from: Vec<Address>,
    /// `Sender`
    pub sender: Vec<Address>,
    /// `Reply-To`
    pub reply_to: Vec<Address>,
    /// `To`
    pub to: Vec<Address>,
    /// `Cc`
    pub cc: Vec<Address>,
    /// `Bcc`
    pub bcc: Vec<Address>,
    /// `In-Reply-To`
    pub in_reply_to: Option<String>,
    /// `Message-ID`
    pub message_id: Option<String>,
}

/// `(name adl mailbox host)`
///
/// Group syntax shows up as entries with a `None` host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Display name.
    pub name: Option<String>,
    /// Source route; always `NIL` in practice.
    pub adl: Option<String>,
    /// Local part.
    pub mailbox: Option<String>,
    /// Domain.
    pub host: Option<String>,
}

impl Address {
    /// `local@domain`, or `None` unless both halves are present.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        let (local, domain) = (self.mailbox.as_ref()?, self.host.as_ref()?);
        Some(format!("{local}@{domain}"))
    }
}

/// The fields every non-multipart part carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BodyFields {
    /// Content-Type parameters as `(name, value)`, in server order.
    pub params: Vec<(String, String)>,
    /// Content-ID.
    pub id: Option<String>,
    /// Content-Description.
    pub description: Option<String>,
    /// Transfer encoding, upper case.
    pub encoding: String,
    /// Encoded size in octets.
    pub size: u32,
}

/// Disposition from body extension data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// `attachment`, `inline`, ... in the server's spelling.
    pub kind: String,
    /// Parameters such as `FILENAME`.
    pub params: Vec<(String, String)>,
}

impl ContentDisposition {
    /// Case-insensitive check for `attachment`.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.kind.eq_ignore_ascii_case("attachment")
    }
}

/// A BODYSTRUCTURE tree. Types and subtypes are upper case.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyStructure {
    /// `multipart/*` with its children in order.
    Multipart {
        /// Child parts.
        parts: Vec<Self>,
        /// `MIXED`, `ALTERNATIVE`, ...
        subtype: String,
        /// Parameters such as `BOUNDARY`.
        params: Vec<(String, String)>,
        /// From extension data, when sent.
        disposition: Option<ContentDisposition>,
    },
    /// `text/*`
    Text {
        /// `PLAIN`, `HTML`, ...
        subtype: String,
        /// Common fields.
        fields: BodyFields,
        /// Line count.
        lines: u32,
        /// From extension data, when sent.
        disposition: Option<ContentDisposition>,
    },
    /// `message/rfc822`, which carries the enclosed message's envelope
    /// and structure.
    Message {
        /// Common fields.
        fields: BodyFields,
        /// Envelope of the enclosed message.
        envelope: Box<Envelope>,
        /// Structure of the enclosed message.
        body: Box<Self>,
        /// Line count.
        lines: u32,
        /// From extension data, when sent.
        disposition: Option<ContentDisposition>,
    },
    /// Any other single part.
    Basic {
        /// `APPLICATION`, `IMAGE`, ...; empty for `NIL`.
        kind: String,
        /// `PDF`, `PNG`, ...
        subtype: String,
        /// Common fields.
        fields: BodyFields,
        /// From extension data, when sent.
        disposition: Option<ContentDisposition>,
    },
}

impl BodyStructure {
    /// `(type, subtype)`.
    #[must_use]
    pub fn media_type(&self) -> (&str, &str) {
        match self {
            Self::Multipart { subtype, .. } => ("MULTIPART", subtype),
            Self::Text { subtype, .. } => ("TEXT", subtype),
            Self::Message { .. } => ("MESSAGE", "RFC822"),
            Self::Basic { kind, subtype, .. } => (kind, subtype),
        }
    }

    /// Disposition from extension data.
    #[must_use]
    pub fn disposition(&self) -> Option<&ContentDisposition> {
        let (Self::Multipart { disposition, .. }
        | Self::Text { disposition, .. }
        | Self::Message { disposition, .. }
        | Self::Basic { disposition, .. }) = self;
        disposition.as_ref()
    }

    /// Whether this is a `multipart/*` node.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart { .. })
    }
}
