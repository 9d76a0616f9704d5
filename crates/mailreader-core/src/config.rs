//! Reader configuration.

use std::time::Duration;

use mailreader_imap::{Config, SessionConfig};

use crate::dsn::Dsn;
use crate::error::ConfigError;

/// Mailbox selected on connect when none is given.
pub const DEFAULT_MAILBOX: &str = "INBOX";

/// Default bound on the connect handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validated reader settings.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Parsed connection string.
    pub dsn: Dsn,
    /// Mailbox selected by [`MailReader::connect`](crate::MailReader::connect).
    pub default_mailbox: String,
    /// Bound on TCP connect, TLS, greeting, login and the initial SELECT.
    pub connect_timeout: Duration,
    /// Skips certificate validation.
    pub accept_invalid_certs: bool,
}

impl ReaderConfig {
    /// Starts a builder from a parsed DSN.
    #[must_use]
    pub fn builder(dsn: Dsn) -> ReaderConfigBuilder {
        ReaderConfigBuilder::new(dsn)
    }

    /// Parses `dsn` and applies defaults.
    ///
    /// # Errors
    ///
    /// Returns the DSN validation error.
    pub fn from_dsn(dsn: &str) -> Result<Self, ConfigError> {
        Ok(Self::builder(Dsn::parse(dsn)?).build())
    }

    /// Connection settings for the IMAP session.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let server = Config::new(self.dsn.host.clone())
            .port(self.dsn.port)
            .security(self.dsn.security.transport())
            .connect_timeout(self.connect_timeout)
            .accept_invalid_certs(self.accept_invalid_certs);
        SessionConfig::new(server, self.dsn.username.clone(), self.dsn.password.clone())
    }
}

/// Builder for [`ReaderConfig`].
#[derive(Debug, Clone)]
pub struct ReaderConfigBuilder {
    dsn: Dsn,
    default_mailbox: String,
    connect_timeout: Duration,
    accept_invalid_certs: Option<bool>,
}

impl ReaderConfigBuilder {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new(dsn: Dsn) -> Self {
        Self {
            dsn,
            default_mailbox: DEFAULT_MAILBOX.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            accept_invalid_certs: None,
        }
    }

    /// Sets the mailbox selected on connect.
    #[must_use]
    pub fn default_mailbox(mut self, mailbox: impl Into<String>) -> Self {
        self.default_mailbox = mailbox.into();
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Overrides the DSN's certificate flag.
    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = Some(accept);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ReaderConfig {
        let accept_invalid_certs = self
            .accept_invalid_certs
            .unwrap_or(!self.dsn.validate_cert);
        ReaderConfig {
            dsn: self.dsn,
            default_mailbox: self.default_mailbox,
            connect_timeout: self.connect_timeout,
            accept_invalid_certs,
        }
    }
}
