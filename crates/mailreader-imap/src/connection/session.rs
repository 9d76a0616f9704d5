//! One connection, one selected mailbox.
//!
//! A [`Session`] is either disconnected or holds a logged-in client with a
//! mailbox open. It never reconnects by itself. Once a command shows the
//! connection is gone (see [`Error::is_connection_lost`]) the client is
//! dropped, and every later call returns [`Error::NotConnected`] until
//! [`Session::connect`] runs again.
//! Transports come from a [`Connector`], which tests replace with a
//! scripted stream.

use std::fmt;
use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};

use super::client::{Client, Selected};
use super::config::{Config, Security};
use super::stream::ImapStream;
use crate::command::{FetchItems, SearchCriteria};
use crate::parser::FetchItem;
use crate::types::{Flag, ListResponse, MailboxStatus, SeqNum, SequenceSet};
use crate::{Error, Result};

/// Opens transports for a [`Session`].
pub trait Connector {
    /// The stream handed to the client.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Connects to `config.host:config.port`. For implicit TLS the stream
    /// comes back already encrypted.
    fn open(&self, config: &Config) -> impl Future<Output = Result<Self::Stream>> + Send;

    /// Secures a plain stream once the server has accepted STARTTLS.
    fn upgrade(
        &self,
        stream: Self::Stream,
        config: &Config,
    ) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// TCP plus rustls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkConnector;

impl Connector for NetworkConnector {
    type Stream = ImapStream;

    fn open(&self, config: &Config) -> impl Future<Output = Result<ImapStream>> + Send {
        ImapStream::connect(config)
    }

    fn upgrade(
        &self,
        stream: ImapStream,
        config: &Config,
    ) -> impl Future<Output = Result<ImapStream>> + Send {
        stream.upgrade(&config.host, config.verify_certificates)
    }
}

/// Transport settings plus LOGIN credentials.
#[derive(Clone)]
pub struct SessionConfig {
    /// Where to connect.
    pub server: Config,
    /// LOGIN user.
    pub username: String,
    /// LOGIN password.
    pub password: String,
}

impl SessionConfig {
    /// Pairs a server with credentials.
    #[must_use]
    pub fn new(server: Config, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            server,
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// A mail session over at most one connection.
pub struct Session<C: Connector = NetworkConnector> {
    connector: C,
    config: SessionConfig,
    link: Option<Client<C::Stream, Selected>>,
}

#[allow(clippy::missing_errors_doc)]
impl<C: Connector> Session<C> {
    /// A disconnected session.
    #[must_use]
    pub const fn new(connector: C, config: SessionConfig) -> Self {
        Self {
            connector,
            config,
            link: None,
        }
    }

    /// Whether a connection is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Name of the open mailbox.
    #[must_use]
    pub fn current_mailbox(&self) -> Option<&str> {
        self.link.as_ref().map(Client::mailbox)
    }

    /// Status from the last successful SELECT.
    #[must_use]
    pub fn mailbox_status(&self) -> Option<&MailboxStatus> {
        self.link.as_ref().map(Client::status)
    }

    /// Connects, upgrades if configured, logs in and selects `mailbox`.
    ///
    /// Any open connection is closed first. The whole sequence must finish
    /// within the configured connect timeout; on any failure the session
    /// stays disconnected.
    pub async fn connect(&mut self, mailbox: &str) -> Result<&MailboxStatus> {
        self.disconnect().await;

        let server = &self.config.server;
        tracing::info!(host = %server.host, port = server.port, security = ?server.security, "connecting");
        if !server.verify_certificates && server.security != Security::None {
            tracing::warn!(host = %server.host, "certificate verification disabled");
        }

        let limit = server.connect_timeout;
        let client = tokio::time::timeout(limit, self.open_selected(mailbox))
            .await
            .map_err(|_| Error::Timeout(limit))??;
        tracing::info!(mailbox, exists = client.status().exists, "mailbox open");

        Ok(self.link.insert(client).status())
    }

    async fn open_selected(&self, mailbox: &str) -> Result<Client<C::Stream, Selected>> {
        let server = &self.config.server;
        let mut client = Client::greet(self.connector.open(server).await?).await?;
        if server.security == Security::StartTls {
            client = client
                .starttls(|plain| self.connector.upgrade(plain, server))
                .await?;
        }
        client
            .login(&self.config.username, &self.config.password)
            .await?
            .select(mailbox)
            .await
    }

    /// Logs out and drops the connection. A no-op when disconnected; a
    /// failed LOGOUT is only logged.
    pub async fn disconnect(&mut self) {
        let Some(client) = self.link.take() else {
            return;
        };
        if let Err(e) = client.logout().await {
            tracing::warn!(error = %e, "logout failed");
        }
        tracing::info!(host = %self.config.server.host, "disconnected");
    }

    /// Opens another mailbox on the current connection.
    ///
    /// When the server refuses it, the previous mailbox is selected again
    /// and the refusal is returned. If that fails too, the connection is
    /// dropped.
    pub async fn select(&mut self, mailbox: &str) -> Result<&MailboxStatus> {
        let client = self.client()?;
        let previous = client.mailbox().to_string();

        if let Some(refusal) = client.select(mailbox).await.err() {
            let restored = match refusal {
                Error::No(_) | Error::Bad(_) => match client.select(&previous).await {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::warn!(mailbox = %previous, error = %e, "previous mailbox not restored");
                        false
                    }
                },
                _ => false,
            };
            if !restored {
                self.drop_link(&refusal);
            }
            return Err(refusal);
        }

        let status = self.mailbox_status().ok_or(Error::NotConnected)?;
        tracing::info!(mailbox, exists = status.exists, "mailbox open");
        Ok(status)
    }

    /// Every mailbox on the server, `LIST "" "*"`.
    pub async fn list(&mut self) -> Result<Vec<ListResponse>> {
        let result = self.client()?.list("", "*").await;
        self.settle(result)
    }

    /// Runs SEARCH in the open mailbox.
    pub async fn search(&mut self, criteria: SearchCriteria) -> Result<Vec<SeqNum>> {
        tracing::debug!(?criteria, "search");
        let result = self.client()?.search(criteria).await;
        self.settle(result)
    }

    /// Runs FETCH in the open mailbox.
    pub async fn fetch(
        &mut self,
        set: &SequenceSet,
        items: FetchItems,
    ) -> Result<Vec<(SeqNum, Vec<FetchItem>)>> {
        let result = self.client()?.fetch(set, items).await;
        self.settle(result)
    }

    /// Adds `flags` to every message in `set`.
    pub async fn add_flags(&mut self, set: &SequenceSet, flags: &[Flag]) -> Result<()> {
        let result = self.client()?.add_flags(set, flags).await.map(drop);
        self.settle(result)
    }

    /// Removes `\Deleted` messages and returns the EXPUNGE notices.
    pub async fn expunge(&mut self) -> Result<Vec<SeqNum>> {
        let result = self.client()?.expunge().await;
        self.settle(result)
    }

    fn client(&mut self) -> Result<&mut Client<C::Stream, Selected>> {
        self.link.as_mut().ok_or(Error::NotConnected)
    }

    /// Passes `result` through, dropping the client first when the error
    /// says the connection is gone.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result
            && e.is_connection_lost()
        {
            self.drop_link(e);
        }
        result
    }

    fn drop_link(&mut self, cause: &Error) {
        if self.link.take().is_some() {
            tracing::warn!(host = %self.config.server.host, error = %cause, "connection dropped");
        }
    }
}

impl<C: Connector> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.config.server.host)
            .field("mailbox", &self.current_mailbox())
            .finish_non_exhaustive()
    }
}
