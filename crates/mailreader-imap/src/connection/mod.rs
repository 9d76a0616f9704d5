//! IMAP connection management.
//!
//! - Configuration (host, port, security mode, certificate checks)
//! - TLS/plaintext stream abstraction
//! - Framed I/O for IMAP protocol
//! - Type-state client
//! - Single-connection session over a pluggable connector

mod client;
mod config;
mod framed;
mod session;
mod stream;
mod tls;

pub use client::{Authenticated, Client, NotAuthenticated, Selected};
pub use config::{Config, Security};
pub use framed::FramedStream;
pub use session::{Connector, NetworkConnector, Session, SessionConfig};
pub use stream::ImapStream;
