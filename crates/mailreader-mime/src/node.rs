//! Body-part tree.

use crate::charset::decode_to_utf8;
use crate::header::{decode_header, decode_param};
use crate::media::{MediaType, TransferEncoding};

/// One node of a message's body-part tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MimeNode {
    /// Top-level media type.
    pub media_type: MediaType,
    /// Subtype as sent by the server.
    pub subtype: String,
    /// Content-Transfer-Encoding.
    pub encoding: TransferEncoding,
    /// Disposition kind (`ATTACHMENT`, `INLINE`, ...).
    pub disposition: Option<String>,
    /// Content-Type parameters, in server order.
    pub parameters: Vec<(String, String)>,
    /// Content-Disposition parameters, in server order.
    pub disposition_parameters: Vec<(String, String)>,
    /// Encoded size in octets.
    pub size: u32,
    /// Dotted section number; empty for a multipart root.
    pub part_number: String,
    /// Child parts in declaration order.
    pub children: Vec<Self>,
}

impl MimeNode {
    /// Creates a node with no parameters or children.
    #[must_use]
    pub fn new(media_type: MediaType, subtype: impl Into<String>) -> Self {
        Self {
            media_type,
            subtype: subtype.into(),
            ..Self::default()
        }
    }

    /// `TYPE/subtype`, type upper case and subtype lower case.
    #[must_use]
    pub fn mime_type(&self) -> String {
        format!(
            "{}/{}",
            self.media_type.as_str(),
            self.subtype.to_ascii_lowercase()
        )
    }

    /// Case-insensitive comparison against a `type/subtype` string.
    #[must_use]
    pub fn matches(&self, mime_type: &str) -> bool {
        let Some((kind, subtype)) = mime_type.trim().split_once('/') else {
            return false;
        };
        self.media_type.as_str().eq_ignore_ascii_case(kind.trim())
            && self.subtype.eq_ignore_ascii_case(subtype.trim())
    }

    /// Returns true for `MULTIPART/*`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.media_type == MediaType::Multipart
    }

    /// Returns true when the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Content-Type parameter by name, ignoring case.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        lookup(&self.parameters, name)
    }

    /// Content-Disposition parameter by name, ignoring case.
    #[must_use]
    pub fn disposition_param(&self, name: &str) -> Option<&str> {
        lookup(&self.disposition_parameters, name)
    }

    /// The `CHARSET` parameter.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    /// Returns true for an `ATTACHMENT` disposition, ignoring case.
    #[must_use]
    pub fn is_attachment_disposition(&self) -> bool {
        self.disposition
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case("attachment"))
    }

    /// Decoded filename.
    ///
    /// The `FILENAME` disposition parameter wins over the `NAME` content
    /// parameter. Both forms go through RFC 2231 and RFC 2047 decoding.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        decode_param(&self.disposition_parameters, "filename")
            .filter(|name| !name.is_empty())
            .or_else(|| decode_param(&self.parameters, "name"))
            .map(|name| decode_header(&name))
    }

    /// Converts decoded section bytes to text using this part's charset.
    #[must_use]
    pub fn decode_text(&self, bytes: &[u8]) -> String {
        decode_to_utf8(bytes, self.charset())
    }

    /// Numbers the tree rooted here.
    ///
    /// A single-part root is `1`. A multipart root keeps an empty number and
    /// its children are `1`, `2`, ... Every other child is
    /// `<parent>.<index>`, 1-based.
    pub fn assign_part_numbers(&mut self) {
        if self.is_multipart() {
            self.part_number.clear();
        } else {
            self.part_number = "1".to_string();
        }
        self.number_children();
    }

    fn number_children(&mut self) {
        let prefix = self.part_number.clone();
        for (index, child) in self.children.iter_mut().enumerate() {
            child.part_number = if prefix.is_empty() {
                (index + 1).to_string()
            } else {
                format!("{prefix}.{}", index + 1)
            };
            child.number_children();
        }
    }

    /// Depth-first search for the first leaf whose type matches `mime_type`.
    #[must_use]
    pub fn find_body(&self, mime_type: &str) -> Option<&Self> {
        if self.is_leaf() {
            return self.matches(mime_type).then_some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_body(mime_type))
    }

    /// Number of nodes in the tree, this one included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

fn lookup<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Lists the parts of `node` that are attachments, in traversal order.
///
/// A part qualifies when its disposition is `ATTACHMENT`, or it carries a
/// `NAME` parameter, or a `FILENAME` disposition parameter. Parts whose
/// decoded filename is empty are skipped. A qualifying part is not
/// descended into.
#[must_use]
pub fn collect_attachments(node: &MimeNode) -> Vec<AttachmentPart<'_>> {
    let qualifies = !node.is_multipart()
        && (node.is_attachment_disposition()
            || node.param("name").is_some()
            || node.disposition_param("filename").is_some()
            || has_extended(&node.parameters, "name")
            || has_extended(&node.disposition_parameters, "filename"));

    if qualifies {
        return match node.filename() {
            Some(filename) if !filename.is_empty() => vec![AttachmentPart { node, filename }],
            _ => Vec::new(),
        };
    }

    let mut found = Vec::new();
    for child in &node.children {
        found.extend(collect_attachments(child));
    }
    found
}

/// An attachment found by [`collect_attachments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPart<'a> {
    /// The attachment's node.
    pub node: &'a MimeNode,
    /// Decoded filename, never empty.
    pub filename: String,
}

fn has_extended(params: &[(String, String)], name: &str) -> bool {
    params.iter().any(|(key, _)| {
        key.len() > name.len()
            && key.is_char_boundary(name.len())
            && key[..name.len()].eq_ignore_ascii_case(name)
            && key[name.len()..].starts_with('*')
    })
}
