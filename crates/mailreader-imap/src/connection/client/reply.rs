//! The parsed outcome of one command.

use crate::parser::{FetchItem, UntaggedResponse};
use crate::types::{Capability, ListResponse, MailboxStatus, ResponseCode, SeqNum, Status};

/// Untagged data received while a command ran, plus its OK completion.
#[derive(Debug, Default)]
pub(crate) struct Reply {
    pub(crate) data: Vec<UntaggedResponse>,
    pub(crate) code: Option<ResponseCode>,
}

impl Reply {
    /// Capabilities announced by `* CAPABILITY` or a `[CAPABILITY ...]`
    /// completion code, the last one winning.
    pub(crate) fn capabilities(&self) -> Option<Vec<Capability>> {
        let from_data = self.data.iter().rev().find_map(|d| match d {
            UntaggedResponse::Capability(caps) => Some(caps),
            _ => None,
        });
        match &self.code {
            Some(ResponseCode::Capability(caps)) => Some(caps.clone()),
            _ => from_data.cloned(),
        }
    }

    pub(crate) fn mailboxes(self) -> Vec<ListResponse> {
        self.data
            .into_iter()
            .filter_map(|d| match d {
                UntaggedResponse::List(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn search_hits(self) -> Vec<SeqNum> {
        self.data
            .into_iter()
            .filter_map(|d| match d {
                UntaggedResponse::Search(ids) => Some(ids),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub(crate) fn fetched(self) -> Vec<(SeqNum, Vec<FetchItem>)> {
        self.data
            .into_iter()
            .filter_map(|d| match d {
                UntaggedResponse::Fetch { seq, items } => Some((seq, items)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn expunged(self) -> Vec<SeqNum> {
        self.data
            .into_iter()
            .filter_map(|d| match d {
                UntaggedResponse::Expunge(seq) => Some(seq),
                _ => None,
            })
            .collect()
    }

    /// Folds SELECT data into a status. Unsent fields keep their defaults.
    pub(crate) fn mailbox_status(&self) -> MailboxStatus {
        let mut status = MailboxStatus::default();
        let codes = self
            .data
            .iter()
            .filter_map(|d| match d {
                UntaggedResponse::Status {
                    status: Status::Ok,
                    code: Some(code),
                    ..
                } => Some(code),
                _ => None,
            })
            .chain(self.code.as_ref());

        for code in codes {
            match code {
                ResponseCode::UidValidity(v) => status.uid_validity = Some(*v),
                ResponseCode::UidNext(v) => status.uid_next = Some(*v),
                ResponseCode::Unseen(v) => status.unseen = Some(*v),
                ResponseCode::ReadOnly => status.read_only = true,
                ResponseCode::ReadWrite => status.read_only = false,
                _ => {}
            }
        }
        for data in &self.data {
            match data {
                UntaggedResponse::Exists(n) => status.exists = *n,
                UntaggedResponse::Recent(n) => status.recent = *n,
                UntaggedResponse::Flags(flags) => status.flags = flags.clone(),
                _ => {}
            }
        }
        status
    }
}
