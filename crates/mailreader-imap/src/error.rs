//! Crate error type.

use std::time::Duration;

use thiserror::Error;

/// Anything that can go wrong talking to the server.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket failure, TLS failure or the peer hanging up.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host name is not usable for TLS server name indication.
    #[error("invalid server name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// A response did not match the grammar.
    #[error("malformed response at byte {position}: {message}")]
    Parse {
        /// Offset into the framed response.
        position: usize,
        /// Expected production.
        message: String,
    },

    /// LOGIN refused, or not permitted by the server.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Tagged NO.
    #[error("server refused: {0}")]
    No(String),

    /// Tagged BAD.
    #[error("server rejected command: {0}")]
    Bad(String),

    /// BYE, as greeting or completion.
    #[error("server closed session: {0}")]
    Bye(String),

    /// Connecting took longer than the configured limit.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Operation impossible in the current connection state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The session holds no connection.
    #[error("not connected")]
    NotConnected,

    /// Framing violations and unexpected server behaviour.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Whether the connection that produced this error can no longer carry
    /// commands: the transport failed, the server hung up, or the response
    /// stream lost its framing.
    #[must_use]
    pub const fn is_connection_lost(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Bye(_) | Self::Protocol(_))
    }
}

/// `Result` with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
