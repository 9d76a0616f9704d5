//! The byte stream under a session: plain TCP or TLS over TCP.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

use super::config::{Config, Security};
use super::tls;
use crate::{Error, Result};

/// A connected transport.
pub enum ImapStream {
    /// Plain TCP.
    Plain(TcpStream),
    /// TLS over TCP.
    Tls(Box<TlsStream<TcpStream>>),
}

impl ImapStream {
    /// Opens the transport `config` describes, within its connect timeout.
    ///
    /// Only [`Security::Implicit`] handshakes here. STARTTLS sessions get a
    /// plain stream and call [`upgrade`](Self::upgrade) after the greeting.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when the limit passes, otherwise the socket or TLS
    /// failure.
    pub async fn connect(config: &Config) -> Result<Self> {
        let open = async {
            let tcp = TcpStream::connect((config.host.as_str(), config.port)).await?;
            tracing::debug!(host = %config.host, port = config.port, "tcp connected");
            match config.security {
                Security::Implicit => {
                    let tls = tls::handshake(tcp, &config.host, config.verify_certificates).await?;
                    Ok(Self::Tls(Box::new(tls)))
                }
                Security::StartTls | Security::None => Ok(Self::Plain(tcp)),
            }
        };
        tokio::time::timeout(config.connect_timeout, open)
            .await
            .map_err(|_| Error::Timeout(config.connect_timeout))?
    }

    /// Wraps a plain stream in TLS once STARTTLS has been accepted.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] when the stream is already encrypted.
    pub async fn upgrade(self, host: &str, verify: bool) -> Result<Self> {
        let Self::Plain(tcp) = self else {
            return Err(Error::InvalidState("stream is already TLS".to_string()));
        };
        let tls = tls::handshake(tcp, host, verify).await?;
        Ok(Self::Tls(Box::new(tls)))
    }

    /// Whether traffic is encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }

    fn io(self: Pin<&mut Self>) -> Pin<&mut dyn Transport> {
        match self.get_mut() {
            Self::Plain(tcp) => Pin::new(tcp),
            Self::Tls(tls) => Pin::new(tls.as_mut()),
        }
    }
}

trait Transport: AsyncRead + AsyncWrite + Unpin {}

impl<T: AsyncRead + AsyncWrite + Unpin> Transport for T {}

impl AsyncRead for ImapStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.io().poll_read(cx, buf)
    }
}

impl AsyncWrite for ImapStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.io().poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.io().poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.io().poll_shutdown(cx)
    }
}
