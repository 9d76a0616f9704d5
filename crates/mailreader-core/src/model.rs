//! Serializable reader results.

use std::path::PathBuf;

use mailreader_imap::{Address, Envelope, FetchItem, Flags, SeqNum};
use mailreader_mime::decode_header;
use serde::{Deserialize, Serialize};

/// Listing row built from envelope metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailOverview {
    /// Sequence number in the selected mailbox.
    pub id: u32,
    /// UID, when the server reported one.
    pub uid: Option<u32>,
    /// Decoded subject.
    pub subject: String,
    /// First sender, `Name <user@host>`.
    pub from: String,
    /// Recipients, comma separated.
    pub to: String,
    /// Raw envelope date.
    pub date: String,
    /// RFC822 size in octets.
    pub size: u32,
    /// `\Seen` is set.
    pub seen: bool,
    /// `\Flagged` is set.
    pub flagged: bool,
    /// `\Answered` is set.
    pub answered: bool,
}

impl EmailOverview {
    /// Builds an overview from the items of one FETCH response.
    #[must_use]
    pub fn from_fetch(id: SeqNum, items: &[FetchItem]) -> Self {
        let mut overview = Self {
            id: id.get(),
            ..Self::default()
        };
        for item in items {
            match item {
                FetchItem::Uid(uid) => overview.uid = Some(uid.get()),
                FetchItem::Flags(flags) => overview.apply_flags(flags),
                FetchItem::Rfc822Size(size) => overview.size = *size,
                FetchItem::Envelope(envelope) => overview.apply_envelope(envelope),
                _ => {}
            }
        }
        overview
    }

    fn apply_flags(&mut self, flags: &Flags) {
        self.seen = flags.is_seen();
        self.flagged = flags.is_flagged();
        self.answered = flags.is_answered();
    }

    fn apply_envelope(&mut self, envelope: &Envelope) {
        self.subject = envelope
            .subject
            .as_deref()
            .map(decode_header)
            .unwrap_or_default();
        self.from = envelope.from.first().map(format_address).unwrap_or_default();
        self.to = envelope
            .to
            .iter()
            .map(format_address)
            .collect::<Vec<_>>()
            .join(", ");
        self.date = envelope.date.clone().unwrap_or_default();
    }
}

/// Formats an envelope address, decoding the display name.
#[must_use]
pub fn format_address(addr: &Address) -> String {
    let email = addr.email().or_else(|| addr.mailbox.clone());
    let name = addr
        .name
        .as_deref()
        .map(decode_header)
        .filter(|n| !n.trim().is_empty());

    match (name, email) {
        (Some(name), Some(email)) => format!("{name} <{email}>"),
        (Some(name), None) => name,
        (None, Some(email)) => email,
        (None, None) => String::new(),
    }
}

/// Attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    /// Position among the message's attachments, from 0.
    pub index: usize,
    /// Decoded filename.
    pub filename: String,
    /// Decoded size in bytes.
    pub size: usize,
    /// `TYPE/subtype`.
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// An attachment with its decoded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentData {
    /// Metadata; `size` equals `data.len()`.
    pub meta: AttachmentMeta,
    /// Section number the content was fetched from.
    pub part_number: String,
    /// Decoded bytes.
    pub data: Vec<u8>,
}

/// A message with attachment metadata and optional bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Listing fields.
    #[serde(flatten)]
    pub overview: EmailOverview,
    /// At least one attachment was found.
    pub has_attachments: bool,
    /// Attachments in traversal order.
    pub attachments: Vec<AttachmentMeta>,
    /// First `text/plain` part, when bodies were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_plain: Option<String>,
    /// First `text/html` part, when bodies were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
}

/// Result of saving an attachment to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDownload {
    /// Sanitized filename written.
    pub filename: String,
    /// Bytes written.
    pub size: usize,
    /// `TYPE/subtype`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Full path of the written file.
    pub path: PathBuf,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use mailreader_imap::{Flag, Uid};

    use super::*;

    fn address(name: Option<&str>, mailbox: &str, host: &str) -> Address {
        Address {
            name: name.map(str::to_string),
            adl: None,
            mailbox: Some(mailbox.to_string()),
            host: Some(host.to_string()),
        }
    }

    #[test]
    fn overview_from_fetch_items() {
        let envelope = Envelope {
            date: Some("Mon, 4 Mar 2024 10:00:00 +0000".to_string()),
            subject: Some("=?utf-8?Q?R=C3=A9union?=".to_string()),
            from: vec![address(Some("=?iso-8859-1?Q?Andr=E9?="), "andre", "example.com")],
            to: vec![
                address(None, "bob", "example.com"),
                address(Some("Carol"), "carol", "example.com"),
            ],
            ..Envelope::default()
        };
        let items = vec![
            FetchItem::Uid(Uid::new(42).unwrap()),
            FetchItem::Flags([Flag::Seen, Flag::Answered].into_iter().collect::<Flags>()),
            FetchItem::Envelope(Box::new(envelope)),
            FetchItem::Rfc822Size(2048),
        ];

        let overview = EmailOverview::from_fetch(SeqNum::new(7).unwrap(), &items);
        assert_eq!(overview.id, 7);
        assert_eq!(overview.uid, Some(42));
        assert_eq!(overview.subject, "Réunion");
        assert_eq!(overview.from, "André <andre@example.com>");
        assert_eq!(overview.to, "bob@example.com, Carol <carol@example.com>");
        assert_eq!(overview.date, "Mon, 4 Mar 2024 10:00:00 +0000");
        assert_eq!(overview.size, 2048);
        assert!(overview.seen);
        assert!(overview.answered);
        assert!(!overview.flagged);
    }

    #[test]
    fn overview_json_shape() {
        let overview = EmailOverview {
            id: 3,
            uid: Some(103),
            subject: "Hi".to_string(),
            ..EmailOverview::default()
        };
        let json = serde_json::to_value(&overview).unwrap();
        for key in [
            "id", "uid", "subject", "from", "to", "date", "size", "seen", "flagged", "answered",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn email_json_flattens_and_omits_missing_bodies() {
        let email = Email {
            overview: EmailOverview {
                id: 1,
                ..EmailOverview::default()
            },
            has_attachments: true,
            attachments: vec![AttachmentMeta {
                index: 0,
                filename: "invoice.pdf".to_string(),
                size: 10,
                mime_type: "APPLICATION/pdf".to_string(),
            }],
            body_plain: None,
            body_html: None,
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["attachments"][0]["type"], "APPLICATION/pdf");
        assert!(json.get("overview").is_none());
        assert!(json.get("body_plain").is_none());
        assert!(json.get("body_html").is_none());

        let with_body = Email {
            body_plain: Some("hello".to_string()),
            ..email
        };
        let json = serde_json::to_value(&with_body).unwrap();
        assert_eq!(json["body_plain"], "hello");
    }

    #[test]
    fn address_without_host() {
        let addr = Address {
            name: None,
            adl: None,
            mailbox: Some("undisclosed-recipients".to_string()),
            host: None,
        };
        assert_eq!(format_address(&addr), "undisclosed-recipients");
    }
}
