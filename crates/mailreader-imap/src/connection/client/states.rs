//! Protocol state markers.

use crate::types::{Mailbox, MailboxStatus};

/// Greeted; not logged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Logged in; no mailbox open.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// A mailbox is open, with the status its SELECT returned.
#[derive(Debug, Clone)]
pub struct Selected {
    pub(super) mailbox: Mailbox,
    pub(super) status: MailboxStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    fn is_send<T: Send>() {}

    #[test]
    fn markers_cross_threads() {
        is_send::<NotAuthenticated>();
        is_send::<Authenticated>();
        is_send::<Selected>();
    }
}
