//! Media types and content transfer encodings.

use std::fmt;

use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::{Error, Result};

/// Top-level media type of a body part.
///
/// The numeric codes are stable and exposed through [`MediaType::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum MediaType {
    /// `text/*`
    Text,
    /// `multipart/*`
    Multipart,
    /// `message/*`
    Message,
    /// `application/*`
    Application,
    /// `audio/*`
    Audio,
    /// `image/*`
    Image,
    /// `video/*`
    Video,
    /// `model/*`
    Model,
    /// Anything else.
    #[default]
    Other,
}

impl MediaType {
    const ALL: [Self; 9] = [
        Self::Text,
        Self::Multipart,
        Self::Message,
        Self::Application,
        Self::Audio,
        Self::Image,
        Self::Video,
        Self::Model,
        Self::Other,
    ];

    /// Parses a type name, ignoring case. Unknown names map to `Other`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| *t != Self::Other && t.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Self::Other)
    }

    /// Upper-case type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Multipart => "MULTIPART",
            Self::Message => "MESSAGE",
            Self::Application => "APPLICATION",
            Self::Audio => "AUDIO",
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
            Self::Model => "MODEL",
            Self::Other => "OTHER",
        }
    }

    /// Numeric code, `TEXT` = 0 through `OTHER` = 8.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MediaType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| Error::Parse(format!("unknown media type code {code}")))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-Transfer-Encoding of a leaf part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferEncoding {
    /// 7bit (default).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "7BIT"))]
    SevenBit,
    /// 8bit.
    #[cfg_attr(feature = "serde", serde(rename = "8BIT"))]
    EightBit,
    /// Binary.
    #[cfg_attr(feature = "serde", serde(rename = "BINARY"))]
    Binary,
    /// Base64.
    #[cfg_attr(feature = "serde", serde(rename = "BASE64"))]
    Base64,
    /// Quoted-printable.
    #[cfg_attr(feature = "serde", serde(rename = "QUOTED-PRINTABLE"))]
    QuotedPrintable,
    /// Unrecognized token; content passes through.
    #[cfg_attr(feature = "serde", serde(rename = "OTHER"))]
    Other,
}

impl TransferEncoding {
    const ALL: [Self; 6] = [
        Self::SevenBit,
        Self::EightBit,
        Self::Binary,
        Self::Base64,
        Self::QuotedPrintable,
        Self::Other,
    ];

    /// Parses an encoding token, ignoring case and surrounding whitespace.
    ///
    /// An empty token is `7BIT`; anything unrecognized is `Other`.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return Self::SevenBit;
        }
        Self::ALL
            .into_iter()
            .find(|e| *e != Self::Other && e.as_str().eq_ignore_ascii_case(token))
            .unwrap_or(Self::Other)
    }

    /// Canonical upper-case token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SevenBit => "7BIT",
            Self::EightBit => "8BIT",
            Self::Binary => "BINARY",
            Self::Base64 => "BASE64",
            Self::QuotedPrintable => "QUOTED-PRINTABLE",
            Self::Other => "OTHER",
        }
    }

    /// Numeric code, `7BIT` = 0 through `OTHER` = 5.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes raw section bytes.
    ///
    /// Base64 and quoted-printable are decoded; every other encoding
    /// passes the bytes through unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if base64 content is malformed beyond what the
    /// lenient decoder accepts.
    pub fn decode(self, raw: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => decode_base64(raw),
            Self::QuotedPrintable => Ok(decode_quoted_printable(raw)),
            _ => Ok(raw.to_vec()),
        }
    }
}

impl TryFrom<u8> for TransferEncoding {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| Error::InvalidEncoding(format!("unknown transfer encoding code {code}")))
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
