//! Charset conversion to UTF-8.
//!
//! Labels are resolved through `encoding_rs` (WHATWG label rules). Invalid
//! byte sequences are dropped rather than replaced; an unknown label falls
//! back to lossy UTF-8.

use encoding_rs::{DecoderResult, Encoding, UTF_8};

/// Decodes `bytes` declared as `label` into a UTF-8 string.
///
/// A missing label and the IMAP placeholder `DEFAULT` both mean UTF-8.
#[must_use]
pub fn decode_to_utf8(bytes: &[u8], label: Option<&str>) -> String {
    let label = label.map(str::trim).unwrap_or_default();
    let encoding = if label.is_empty() || label.eq_ignore_ascii_case("default") {
        Some(UTF_8)
    } else {
        Encoding::for_label(label.as_bytes())
    };

    match encoding {
        Some(encoding) if encoding == UTF_8 => utf8_dropping_invalid(bytes),
        Some(encoding) => transcode_dropping_invalid(encoding, bytes),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

fn transcode_dropping_invalid(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut out = String::new();
    let mut pos = 0;

    loop {
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(bytes.len() - pos)
            .unwrap_or(bytes.len() - pos + 16);
        out.reserve(needed);

        let (result, read) =
            decoder.decode_to_string_without_replacement(&bytes[pos..], &mut out, true);
        pos += read;

        match result {
            DecoderResult::InputEmpty => return out,
            DecoderResult::OutputFull | DecoderResult::Malformed(..) => {}
        }
    }
}
