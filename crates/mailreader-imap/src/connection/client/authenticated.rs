//! Commands available after LOGIN.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Result;
use crate::command::Command;
use crate::types::{ListResponse, Mailbox};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Opens `mailbox` read-write.
    pub async fn select(mut self, mailbox: &str) -> Result<Client<S, Selected>> {
        let mailbox = Mailbox::new(mailbox);
        let reply = self
            .execute(Command::Select {
                mailbox: mailbox.clone(),
            })
            .await?;
        let status = reply.mailbox_status();
        Ok(self.into_state(Selected { mailbox, status }))
    }

    /// `LIST reference pattern`.
    pub async fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<ListResponse>> {
        list(self, reference, pattern).await
    }

    /// Sends LOGOUT.
    pub async fn logout(self) -> Result<()> {
        self.close().await
    }
}

pub(super) async fn list<S, State>(
    client: &mut Client<S, State>,
    reference: &str,
    pattern: &str,
) -> Result<Vec<ListResponse>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let reply = client
        .execute(Command::List {
            reference: reference.to_string(),
            pattern: pattern.to_string(),
        })
        .await?;
    Ok(reply.mailboxes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use tokio_test::io::Builder;

    use super::super::scripted;
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn select_quotes_name_with_space() {
        let mock = Builder::new()
            .write(b"A0000 SELECT \"Sent Items\"\r\n")
            .read(b"* 7 EXISTS\r\n* 2 RECENT\r\n")
            .read(b"A0000 OK [READ-WRITE] SELECT completed\r\n")
            .build();
        let client = scripted(mock, Authenticated).select("Sent Items").await.unwrap();
        assert_eq!(client.mailbox(), "Sent Items");
        assert_eq!(client.status().exists, 7);
        assert_eq!(client.status().recent, 2);
    }

    #[tokio::test]
    async fn select_missing_mailbox() {
        let mock = Builder::new()
            .write(b"A0000 SELECT Nope\r\n")
            .read(b"A0000 NO [NONEXISTENT] Mailbox doesn't exist\r\n")
            .build();
        let err = scripted(mock, Authenticated).select("Nope").await.unwrap_err();
        assert!(matches!(err, Error::No(_)));
    }

    #[tokio::test]
    async fn list_keeps_server_order() {
        let mock = Builder::new()
            .write(b"A0000 LIST \"\" \"*\"\r\n")
            .read(b"* LIST (\\HasNoChildren) \"/\" INBOX\r\n")
            .read(b"* LIST (\\Noselect \\HasChildren) \"/\" \"[Gmail]\"\r\n")
            .read(b"* LIST (\\HasNoChildren) \"/\" \"[Gmail]/Sent Mail\"\r\n")
            .read(b"A0000 OK LIST completed\r\n")
            .build();
        let mut client = scripted(mock, Authenticated);
        let entries = client.list("", "*").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.mailbox.as_str()).collect();
        assert_eq!(names, ["INBOX", "[Gmail]", "[Gmail]/Sent Mail"]);
        assert!(!entries[1].is_selectable());
    }
}
