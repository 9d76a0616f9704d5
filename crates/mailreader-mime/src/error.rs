//! MIME decoding errors.

/// Failure to interpret MIME content or metadata.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown transfer encoding, or content that violates it.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 content that cannot be repaired.
    #[error("bad base64: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Unrecognised structural value, such as an out-of-range media type code.
    #[error("cannot parse: {0}")]
    Parse(String),
}

/// `Result` with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
