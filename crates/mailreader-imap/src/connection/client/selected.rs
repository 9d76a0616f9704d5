//! Commands available with a mailbox open.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::authenticated::list;
use super::states::Selected;
use crate::Result;
use crate::command::{Command, FetchItems, SearchCriteria};
use crate::parser::FetchItem;
use crate::types::{Flag, ListResponse, Mailbox, MailboxStatus, SeqNum, SequenceSet};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// The open mailbox.
    #[must_use]
    pub fn mailbox(&self) -> &str {
        self.state.mailbox.as_str()
    }

    /// What the last successful SELECT reported.
    #[must_use]
    pub const fn status(&self) -> &MailboxStatus {
        &self.state.status
    }

    /// Switches to another mailbox. A refusal leaves the recorded
    /// selection as it was.
    pub async fn select(&mut self, mailbox: &str) -> Result<&MailboxStatus> {
        let mailbox = Mailbox::new(mailbox);
        let reply = self
            .execute(Command::Select {
                mailbox: mailbox.clone(),
            })
            .await?;
        self.state = Selected {
            mailbox,
            status: reply.mailbox_status(),
        };
        Ok(&self.state.status)
    }

    /// `LIST reference pattern`.
    pub async fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<ListResponse>> {
        list(self, reference, pattern).await
    }

    /// Sequence numbers matching `criteria`, in server order.
    pub async fn search(&mut self, criteria: SearchCriteria) -> Result<Vec<SeqNum>> {
        Ok(self.execute(Command::Search(criteria)).await?.search_hits())
    }

    /// One `(sequence number, items)` pair per FETCH response, in the order
    /// the server sent them.
    pub async fn fetch(
        &mut self,
        set: &SequenceSet,
        items: FetchItems,
    ) -> Result<Vec<(SeqNum, Vec<FetchItem>)>> {
        let command = Command::Fetch {
            set: set.clone(),
            items,
        };
        Ok(self.execute(command).await?.fetched())
    }

    /// `STORE set +FLAGS (...)`. Returns the FETCH data echoed back.
    pub async fn add_flags(
        &mut self,
        set: &SequenceSet,
        flags: &[Flag],
    ) -> Result<Vec<(SeqNum, Vec<FetchItem>)>> {
        let command = Command::AddFlags {
            set: set.clone(),
            flags: flags.to_vec(),
        };
        Ok(self.execute(command).await?.fetched())
    }

    /// Removes `\Deleted` messages; returns the EXPUNGE notices in order.
    pub async fn expunge(&mut self) -> Result<Vec<SeqNum>> {
        Ok(self.execute(Command::Expunge).await?.expunged())
    }

    /// Sends LOGOUT.
    pub async fn logout(self) -> Result<()> {
        self.close().await
    }
}
