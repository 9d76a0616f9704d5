//! FETCH data: message attributes, envelopes and body structures.

use super::reader::Reader;
use super::response::{flag_list, nonzero};
use super::types::{Address, BodyFields, BodyStructure, ContentDisposition, Envelope, FetchItem};
use crate::Result;
use crate::types::Uid;

/// The parenthesized attribute list of a FETCH response.
///
/// Attributes this crate never requests are stepped over.
pub fn msg_att(r: &mut Reader<'_>) -> Result<Vec<FetchItem>> {
    r.byte(b'(')?;
    let mut items = Vec::new();
    loop {
        match r.peek() {
            Some(b')') => {
                r.advance();
                return Ok(items);
            }
            Some(b' ') => r.advance(),
            Some(_) => items.extend(fetch_item(r)?),
            None => return Err(r.fail("unterminated FETCH data")),
        }
    }
}

fn fetch_item(r: &mut Reader<'_>) -> Result<Option<FetchItem>> {
    let name = r.atom()?.to_ascii_uppercase();
    let item = match name.as_str() {
        "FLAGS" => {
            r.sp()?;
            FetchItem::Flags(flag_list(r)?)
        }
        "UID" => {
            r.sp()?;
            FetchItem::Uid(nonzero(r, "UID", Uid::new)?)
        }
        "RFC822.SIZE" => {
            r.sp()?;
            FetchItem::Rfc822Size(r.number()?)
        }
        "ENVELOPE" => {
            r.sp()?;
            FetchItem::Envelope(Box::new(envelope(r)?))
        }
        "BODYSTRUCTURE" => {
            r.sp()?;
            FetchItem::BodyStructure(body(r)?)
        }
        // `BODY (` without a section is the non-extensible structure
        "BODY" if r.peek() == Some(b' ') => {
            r.sp()?;
            FetchItem::BodyStructure(body(r)?)
        }
        "BODY" | "RFC822" | "RFC822.TEXT" | "RFC822.HEADER" => {
            let section = section_spec(r)?;
            let section = match name.as_str() {
                "RFC822.TEXT" => Some("TEXT".to_string()),
                "RFC822.HEADER" => Some("HEADER".to_string()),
                _ => section,
            };
            r.sp()?;
            FetchItem::Section {
                section,
                data: r.nstring()?,
            }
        }
        _ => {
            section_spec(r)?;
            if r.eat(b' ') {
                r.skip_value()?;
            }
            return Ok(None);
        }
    };
    Ok(Some(item))
}

/// Optional `[section]` directly after an attribute name. A partial
/// fetch `<origin>` is skipped.
fn section_spec(r: &mut Reader<'_>) -> Result<Option<String>> {
    let mut section = None;
    if r.eat(b'[') {
        let raw = r
            .take_until(b']')
            .ok_or_else(|| r.fail("unterminated body section"))?;
        r.advance();
        if !raw.is_empty() {
            section = Some(String::from_utf8_lossy(raw).into_owned());
        }
    }

    if r.eat(b'<') {
        r.number()?;
        r.byte(b'>')?;
    }
    Ok(section)
}

/// Runs `item` after a required space.
fn after_sp<'a, T>(
    r: &mut Reader<'a>,
    item: impl FnOnce(&mut Reader<'a>) -> Result<T>,
) -> Result<T> {
    r.sp()?;
    item(r)
}

fn envelope(r: &mut Reader<'_>) -> Result<Envelope> {
    r.byte(b'(')?;
    let envelope = Envelope {
        date: r.nstring_text()?,
        subject: after_sp(r, Reader::nstring_text)?,
        from: after_sp(r, addresses)?,
        sender: after_sp(r, addresses)?,
        reply_to: after_sp(r, addresses)?,
        to: after_sp(r, addresses)?,
        cc: after_sp(r, addresses)?,
        bcc: after_sp(r, addresses)?,
        in_reply_to: after_sp(r, Reader::nstring_text)?,
        message_id: after_sp(r, Reader::nstring_text)?,
    };
    r.byte(b')')?;
    Ok(envelope)
}

fn addresses(r: &mut Reader<'_>) -> Result<Vec<Address>> {
    if r.nil() {
        return Ok(Vec::new());
    }
    r.byte(b'(')?;
    let mut list = Vec::new();
    loop {
        match r.peek() {
            Some(b')') => {
                r.advance();
                return Ok(list);
            }
            Some(b' ') => r.advance(),
            Some(b'(') => list.push(address(r)?),
            _ => return Err(r.fail("malformed address list")),
        }
    }
}

fn address(r: &mut Reader<'_>) -> Result<Address> {
    r.byte(b'(')?;
    let address = Address {
        name: r.nstring_text()?,
        adl: after_sp(r, Reader::nstring_text)?,
        mailbox: after_sp(r, Reader::nstring_text)?,
        host: after_sp(r, Reader::nstring_text)?,
    };
    r.byte(b')')?;
    Ok(address)
}

/// One body of a BODYSTRUCTURE, recursing into multiparts and enclosed
/// messages.
///
/// Extension data beyond the disposition (language, location and anything
/// newer) is stepped over.
pub fn body(r: &mut Reader<'_>) -> Result<BodyStructure> {
    r.byte(b'(')?;
    let structure = if r.peek() == Some(b'(') {
        multipart(r)?
    } else {
        single_part(r)?
    };
    r.close_list()?;
    Ok(structure)
}

fn multipart(r: &mut Reader<'_>) -> Result<BodyStructure> {
    let mut parts = Vec::new();
    while r.peek() == Some(b'(') {
        parts.push(body(r)?);
        r.eat(b' ');
    }
    let subtype = upper(r)?;

    let mut params = Vec::new();
    let mut disposition = None;
    if r.eat(b' ') {
        params = body_params(r)?;
        if r.eat(b' ') {
            disposition = body_disposition(r)?;
        }
    }

    Ok(BodyStructure::Multipart {
        parts,
        subtype,
        params,
        disposition,
    })
}

fn single_part(r: &mut Reader<'_>) -> Result<BodyStructure> {
    let media_type = upper(r)?;
    let media_subtype = after_sp(r, upper)?;
    let fields = after_sp(r, body_fields)?;

    if media_type == "TEXT" {
        let lines = after_sp(r, Reader::number)?;
        return Ok(BodyStructure::Text {
            subtype: media_subtype,
            fields,
            lines,
            disposition: single_part_extension(r)?,
        });
    }

    if media_type == "MESSAGE" && media_subtype == "RFC822" {
        let enclosed_envelope = after_sp(r, envelope)?;
        let enclosed_body = after_sp(r, body)?;
        let lines = after_sp(r, Reader::number)?;
        return Ok(BodyStructure::Message {
            fields,
            envelope: Box::new(enclosed_envelope),
            body: Box::new(enclosed_body),
            lines,
            disposition: single_part_extension(r)?,
        });
    }

    Ok(BodyStructure::Basic {
        kind: media_type,
        subtype: media_subtype,
        fields,
        disposition: single_part_extension(r)?,
    })
}

/// An nstring folded to upper case; `NIL` becomes empty.
fn upper(r: &mut Reader<'_>) -> Result<String> {
    Ok(r.nstring_text()?.unwrap_or_default().to_ascii_uppercase())
}

fn body_fields(r: &mut Reader<'_>) -> Result<BodyFields> {
    Ok(BodyFields {
        params: body_params(r)?,
        id: after_sp(r, Reader::nstring_text)?,
        description: after_sp(r, Reader::nstring_text)?,
        encoding: after_sp(r, upper)?,
        size: after_sp(r, Reader::number)?,
    })
}

/// `[SP md5 [SP disposition ...]]`
fn single_part_extension(r: &mut Reader<'_>) -> Result<Option<ContentDisposition>> {
    if !r.eat(b' ') {
        return Ok(None);
    }
    r.nstring()?;
    if !r.eat(b' ') {
        return Ok(None);
    }
    body_disposition(r)
}

/// `NIL` or `("kind" params)`.
fn body_disposition(r: &mut Reader<'_>) -> Result<Option<ContentDisposition>> {
    if r.nil() {
        return Ok(None);
    }
    r.byte(b'(')?;
    let kind = r.nstring_text()?.unwrap_or_default();
    r.eat(b' ');
    let params = if r.peek() == Some(b')') {
        Vec::new()
    } else {
        body_params(r)?
    };
    r.byte(b')')?;
    Ok(Some(ContentDisposition { kind, params }))
}

/// `NIL` or `("key" "value" ...)`, keys in the server's case.
fn body_params(r: &mut Reader<'_>) -> Result<Vec<(String, String)>> {
    if r.nil() {
        return Ok(Vec::new());
    }
    r.byte(b'(')?;
    let mut params = Vec::new();
    loop {
        match r.peek() {
            Some(b')') => {
                r.advance();
                return Ok(params);
            }
            Some(b' ') => r.advance(),
            Some(_) => {
                let key = r.nstring_text()?.unwrap_or_default();
                let value = after_sp(r, Reader::nstring_text)?.unwrap_or_default();
                params.push((key, value));
            }
            None => return Err(r.fail("unterminated body parameters")),
        }
    }
}
