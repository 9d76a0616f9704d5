//! Header text decoding.
//!
//! Resolves RFC 2047 encoded words (`=?charset?B|Q?text?=`) and RFC 2231
//! extended parameters (`filename*=utf-8''na%C3%AFve.txt`, `filename*0*=`)
//! into UTF-8.

use percent_encoding::percent_decode_str;

use crate::charset::decode_to_utf8;
use crate::encoding::{decode_base64, decode_quoted_printable};

/// Decodes every RFC 2047 encoded word in `text`.
///
/// Whitespace between two adjacent encoded words is removed (RFC 2047 §6.2).
/// Consecutive words in the same charset are joined before conversion, so a
/// multi-byte character split across words survives. Malformed words are
/// kept verbatim. Never fails.
#[must_use]
pub fn decode_header(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending: Option<(String, Vec<u8>)> = None;
    let mut gap = "";
    let mut rest = text;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);
        let Some((word, consumed)) = parse_encoded_word(candidate) else {
            flush(&mut out, &mut pending);
            out.push_str(gap);
            gap = "";
            out.push_str(before);
            out.push_str("=?");
            rest = &candidate[2..];
            continue;
        };

        let adjacent = pending.is_some() && before.trim().is_empty();
        if !adjacent {
            flush(&mut out, &mut pending);
            out.push_str(gap);
            out.push_str(before);
        }
        gap = "";

        match &mut pending {
            Some((charset, bytes)) if charset.eq_ignore_ascii_case(&word.charset) => {
                bytes.extend_from_slice(&word.bytes);
            }
            _ => {
                flush(&mut out, &mut pending);
                pending = Some((word.charset, word.bytes));
            }
        }

        rest = &candidate[consumed..];
        // Whitespace up to the next word is held back until we know whether
        // that word is adjacent.
        let trailing = rest.len() - rest.trim_start().len();
        if rest[trailing..].starts_with("=?") {
            gap = &rest[..trailing];
            rest = &rest[trailing..];
        }
    }

    flush(&mut out, &mut pending);
    out.push_str(gap);
    out.push_str(rest);
    out
}

struct EncodedWord {
    charset: String,
    bytes: Vec<u8>,
}

/// Parses one encoded word at the start of `input`, returning it and its
/// length in bytes.
fn parse_encoded_word(input: &str) -> Option<(EncodedWord, usize)> {
    let body = input.strip_prefix("=?")?;
    let (charset, body) = body.split_once('?')?;
    let (encoding, body) = body.split_once('?')?;
    let end = body.find("?=")?;
    let payload = &body[..end];

    if charset.is_empty() || payload.contains(char::is_whitespace) {
        return None;
    }
    // RFC 2231 §5 language suffix: `utf-8*en`.
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes = if encoding.eq_ignore_ascii_case("B") {
        decode_base64(payload.as_bytes()).ok()?
    } else if encoding.eq_ignore_ascii_case("Q") {
        decode_quoted_printable(payload.replace('_', " ").as_bytes())
    } else {
        return None;
    };

    let consumed = 2 + charset_len(input) + 1 + encoding.len() + 1 + end + 2;
    Some((
        EncodedWord {
            charset: charset.to_string(),
            bytes,
        },
        consumed,
    ))
}

/// Length of the raw charset field, language suffix included.
fn charset_len(input: &str) -> usize {
    input[2..].find('?').unwrap_or(0)
}

fn flush(out: &mut String, pending: &mut Option<(String, Vec<u8>)>) {
    if let Some((charset, bytes)) = pending.take() {
        out.push_str(&decode_to_utf8(&bytes, Some(&charset)));
    }
}

/// Looks up parameter `name`, honouring RFC 2231 extended forms.
///
/// Tries, in order: `name*` (single extended value), `name*0`, `name*0*`,
/// ... (continuations, reassembled in index order) and finally plain `name`,
/// whose value goes through [`decode_header`]. Names compare
/// case-insensitively.
#[must_use]
pub fn decode_param(params: &[(String, String)], name: &str) -> Option<String> {
    if let Some(value) = find(params, &format!("{name}*")) {
        return Some(decode_extended(value));
    }

    let mut segments: Vec<(u32, bool, &str)> = params
        .iter()
        .filter_map(|(key, value)| {
            let suffix = strip_prefix_ignore_case(key, name)?.strip_prefix('*')?;
            let (index, extended) = match suffix.strip_suffix('*') {
                Some(index) => (index, true),
                None => (suffix, false),
            };
            Some((index.parse().ok()?, extended, value.as_str()))
        })
        .collect();

    if !segments.is_empty() {
        segments.sort_by_key(|(index, ..)| *index);
        return Some(join_continuations(&segments));
    }

    find(params, name).map(decode_header)
}

fn find<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

fn strip_prefix_ignore_case<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then_some(&key[prefix.len()..])
}

/// Decodes `charset'language'percent-encoded` into UTF-8.
fn decode_extended(value: &str) -> String {
    let mut parts = value.splitn(3, '\'');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(charset), Some(_language), Some(encoded)) => {
            let bytes: Vec<u8> = percent_decode_str(encoded).collect();
            decode_to_utf8(&bytes, Some(charset))
        }
        _ => {
            let bytes: Vec<u8> = percent_decode_str(value).collect();
            decode_to_utf8(&bytes, None)
        }
    }
}

/// Reassembles sorted continuation segments.
///
/// Only the first segment carries the charset; extended segments are
/// percent-decoded, plain ones are taken literally.
fn join_continuations(segments: &[(u32, bool, &str)]) -> String {
    let mut charset = None;
    let mut bytes = Vec::new();

    for (position, (_, extended, value)) in segments.iter().enumerate() {
        let mut value = *value;
        if position == 0 && *extended {
            let mut parts = value.splitn(3, '\'');
            if let (Some(cs), Some(_), Some(encoded)) = (parts.next(), parts.next(), parts.next())
            {
                charset = Some(cs);
                value = encoded;
            }
        }
        if *extended {
            bytes.extend(percent_decode_str(value));
        } else {
            bytes.extend_from_slice(value.as_bytes());
        }
    }

    decode_to_utf8(&bytes, charset.filter(|cs| !cs.is_empty()))
}
