//! Content-Transfer-Encoding codecs.
//!
//! Decoding is lenient in the ways real mail needs: base64 ignores line
//! breaks and missing padding, and quoted-printable passes malformed escapes
//! through untouched.

use std::fmt::Write as _;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::Result;

/// Standard alphabet, padding optional, trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Quoted-printable output line limit, soft break included.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64, skipping whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if a non-alphabet character remains after whitespace
/// is removed.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(LENIENT.decode(cleaned)?)
}

/// Encodes bytes as quoted-printable (RFC 2045 §6.7).
///
/// Every byte outside printable ASCII, CR and LF included, is escaped, so
/// decoding returns the exact input.
#[must_use]
pub fn encode_quoted_printable(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    let mut line_length = 0;

    for (i, &byte) in data.iter().enumerate() {
        // A trailing space would be stripped in transit.
        let literal = matches!(byte, b'!'..=b'<' | b'>'..=b'~')
            || (byte == b' ' && i + 1 < data.len());
        let width = if literal { 1 } else { 3 };

        if line_length + width > MAX_LINE_LENGTH - 1 {
            out.push_str("=\r\n");
            line_length = 0;
        }

        if literal {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "={byte:02X}");
        }
        line_length += width;
    }

    out
}

/// Decodes quoted-printable bytes.
///
/// Soft line breaks (`=` before CRLF or LF, with optional transport padding)
/// are removed. An `=` not followed by two hex digits is kept literally.
#[must_use]
pub fn decode_quoted_printable(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        if byte != b'=' {
            out.push(byte);
            i += 1;
            continue;
        }

        if let Some(end) = soft_break_end(&data[i + 1..]) {
            i += 1 + end;
            continue;
        }

        match (data.get(i + 1), data.get(i + 2)) {
            (Some(&hi), Some(&lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                out.push((hex_value(hi) << 4) | hex_value(lo));
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }

    out
}

/// Length of `[ \t]* (CRLF | LF)` at the start of `rest`, if present.
fn soft_break_end(rest: &[u8]) -> Option<usize> {
    let padding = rest.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
    match &rest[padding..] {
        [b'\r', b'\n', ..] => Some(padding + 2),
        [b'\n', ..] => Some(padding + 1),
        _ => None,
    }
}

const fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}
