//! Conversion from BODYSTRUCTURE to the MIME tree.

use mailreader_imap::{BodyFields, BodyStructure, ContentDisposition};
use mailreader_mime::{MediaType, MimeNode, TransferEncoding};

/// Builds a numbered [`MimeNode`] tree from a parsed BODYSTRUCTURE.
#[must_use]
pub fn to_mime_tree(structure: &BodyStructure) -> MimeNode {
    #[cfg(test)]
    counter::bump();

    let mut root = convert(structure);
    root.assign_part_numbers();
    root
}

fn convert(structure: &BodyStructure) -> MimeNode {
    match structure {
        BodyStructure::Text {
            subtype,
            fields,
            disposition,
            ..
        } => leaf(MediaType::Text, subtype, fields, disposition.as_ref()),
        BodyStructure::Basic {
            kind,
            subtype,
            fields,
            disposition,
        } => leaf(MediaType::parse(kind), subtype, fields, disposition.as_ref()),
        BodyStructure::Message {
            fields,
            body,
            disposition,
            ..
        } => {
            let mut node = leaf(MediaType::Message, "RFC822", fields, disposition.as_ref());
            node.children = match body.as_ref() {
                BodyStructure::Multipart { parts, .. } => parts.iter().map(convert).collect(),
                enclosed => vec![convert(enclosed)],
            };
            node
        }
        BodyStructure::Multipart {
            parts,
            subtype,
            params,
            disposition,
        } => {
            let mut node = MimeNode::new(MediaType::Multipart, subtype.clone());
            node.parameters.clone_from(params);
            apply_disposition(&mut node, disposition.as_ref());
            node.children = parts.iter().map(convert).collect();
            node
        }
    }
}

fn leaf(
    media_type: MediaType,
    subtype: &str,
    fields: &BodyFields,
    disposition: Option<&ContentDisposition>,
) -> MimeNode {
    let mut node = MimeNode {
        encoding: TransferEncoding::parse(&fields.encoding),
        parameters: fields.params.clone(),
        size: fields.size,
        ..MimeNode::new(media_type, subtype)
    };
    apply_disposition(&mut node, disposition);
    node
}

fn apply_disposition(node: &mut MimeNode, disposition: Option<&ContentDisposition>) {
    if let Some(d) = disposition {
        node.disposition = Some(d.kind.clone());
        node.disposition_parameters.clone_from(&d.params);
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use mailreader_imap::Envelope;

    use super::*;

    fn fields(params: &[(&str, &str)], encoding: &str, size: u32) -> BodyFields {
        BodyFields {
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            encoding: encoding.to_string(),
            size,
            ..BodyFields::default()
        }
    }

    fn text(subtype: &str) -> BodyStructure {
        BodyStructure::Text {
            subtype: subtype.to_string(),
            fields: fields(&[("CHARSET", "utf-8")], "QUOTED-PRINTABLE", 120),
            lines: 4,
            disposition: None,
        }
    }

    #[test]
    fn single_part_is_numbered_one() {
        let node = to_mime_tree(&text("PLAIN"));
        assert_eq!(node.part_number, "1");
        assert_eq!(node.media_type, MediaType::Text);
        assert_eq!(node.encoding, TransferEncoding::QuotedPrintable);
        assert_eq!(node.charset(), Some("utf-8"));
        assert_eq!(node.size, 120);
    }

    #[test]
    fn mixed_with_attachment() {
        let pdf = BodyStructure::Basic {
            kind: "APPLICATION".to_string(),
            subtype: "PDF".to_string(),
            fields: fields(&[("NAME", "invoice.pdf")], "BASE64", 5000),
            disposition: Some(ContentDisposition {
                kind: "ATTACHMENT".to_string(),
                params: vec![("FILENAME".to_string(), "invoice.pdf".to_string())],
            }),
        };
        let root = BodyStructure::Multipart {
            parts: vec![text("PLAIN"), text("HTML"), pdf],
            subtype: "MIXED".to_string(),
            params: vec![("BOUNDARY".to_string(), "b1".to_string())],
            disposition: None,
        };

        let node = to_mime_tree(&root);
        assert_eq!(node.part_number, "");
        assert_eq!(node.param("boundary"), Some("b1"));
        let numbers: Vec<_> = node.children.iter().map(|c| c.part_number.as_str()).collect();
        assert_eq!(numbers, ["1", "2", "3"]);

        let pdf = &node.children[2];
        assert_eq!(pdf.mime_type(), "APPLICATION/pdf");
        assert_eq!(pdf.encoding, TransferEncoding::Base64);
        assert!(pdf.is_attachment_disposition());
        assert_eq!(pdf.disposition_param("filename"), Some("invoice.pdf"));
    }

    #[test]
    fn enclosed_message_children_nest_under_its_number() {
        let inner = BodyStructure::Multipart {
            parts: vec![text("PLAIN"), text("HTML")],
            subtype: "ALTERNATIVE".to_string(),
            params: vec![],
            disposition: None,
        };
        let forwarded = BodyStructure::Message {
            fields: fields(&[], "7BIT", 900),
            envelope: Box::new(Envelope::default()),
            body: Box::new(inner),
            lines: 30,
            disposition: None,
        };
        let root = BodyStructure::Multipart {
            parts: vec![text("PLAIN"), forwarded],
            subtype: "MIXED".to_string(),
            params: vec![],
            disposition: None,
        };

        let node = to_mime_tree(&root);
        let message = &node.children[1];
        assert_eq!(message.mime_type(), "MESSAGE/rfc822");
        assert_eq!(message.part_number, "2");
        assert_eq!(message.children[0].part_number, "2.1");
        assert_eq!(message.children[1].part_number, "2.2");
        assert_eq!(node.find_body("text/html").unwrap().part_number, "2.2");
    }

    #[test]
    fn enclosed_single_part_message() {
        let forwarded = BodyStructure::Message {
            fields: fields(&[], "7BIT", 200),
            envelope: Box::new(Envelope::default()),
            body: Box::new(text("PLAIN")),
            lines: 8,
            disposition: None,
        };
        let root = BodyStructure::Multipart {
            parts: vec![text("HTML"), forwarded],
            subtype: "MIXED".to_string(),
            params: vec![],
            disposition: None,
        };
        let node = to_mime_tree(&root);
        assert_eq!(node.children[1].children[0].part_number, "2.1");
    }

    #[test]
    fn unknown_type_is_other() {
        let part = BodyStructure::Basic {
            kind: "X-CUSTOM".to_string(),
            subtype: "THING".to_string(),
            fields: fields(&[], "X-UUENCODE", 10),
            disposition: None,
        };
        let node = to_mime_tree(&part);
        assert_eq!(node.media_type, MediaType::Other);
        assert_eq!(node.encoding, TransferEncoding::Other);
    }

    #[test]
    fn counter_tracks_conversions() {
        let before = counter::count();
        let _ = to_mime_tree(&text("PLAIN"));
        assert_eq!(counter::count(), before + 1);
    }
}
