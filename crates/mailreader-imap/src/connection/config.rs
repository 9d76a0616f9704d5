//! Where and how to reach the server.

use std::time::Duration;

/// Transport security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Plain TCP for the whole session.
    None,
    /// Plain TCP, upgraded with STARTTLS before LOGIN.
    StartTls,
    /// TLS from the first byte.
    #[default]
    Implicit,
}

impl Security {
    /// 993 for implicit TLS, 143 otherwise.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        if matches!(self, Self::Implicit) { 993 } else { 143 }
    }
}

/// Server address, security mode and connect limits.
///
/// Built by chaining setters on [`Config::new`]:
///
/// ```
/// use mailreader_imap::{Config, Security};
///
/// let config = Config::new("imap.example.com").security(Security::StartTls);
/// assert_eq!(config.port, 143);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Host name, also used for SNI and certificate checks.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Transport security.
    pub security: Security,
    /// Bound on TCP connect plus TLS handshake.
    pub connect_timeout: Duration,
    /// Verify the certificate chain and host name.
    pub verify_certificates: bool,
    port_set: bool,
}

impl Config {
    /// Implicit TLS on 993, verified certificates, 30 second connect limit.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Security::Implicit.default_port(),
            security: Security::Implicit,
            connect_timeout: Duration::from_secs(30),
            verify_certificates: true,
            port_set: false,
        }
    }

    /// Overrides the port implied by the security mode.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self.port_set = true;
        self
    }

    /// Changes the security mode. The port follows unless set explicitly.
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = security;
        if !self.port_set {
            self.port = security.default_port();
        }
        self
    }

    /// Bounds connect plus handshake.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Skips certificate verification when `accept` is true.
    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.verify_certificates = !accept;
        self
    }
}
