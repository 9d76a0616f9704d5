//! Type-state IMAP client.
//!
//! ```text
//! NotAuthenticated ──login──▶ Authenticated ──select──▶ Selected
//! ```
//!
//! Each state exposes only the commands valid in it, so sending SEARCH
//! before SELECT does not compile. Commands are strictly sequential: one
//! tagged command is written, then everything up to its completion is read
//! and parsed into a [`Reply`].

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod reply;
mod selected;
mod states;

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};

pub(crate) use self::reply::Reply;
pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::FramedStream;
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser};
use crate::types::{Capability, Status};
use crate::{Error, Result};

/// A connection in protocol state `State`.
pub struct Client<S, State> {
    conn: FramedStream<S>,
    tags: TagGenerator,
    caps: Vec<Capability>,
    state: State,
}

impl<S, State: fmt::Debug> fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Capabilities from the greeting or the last login/CAPABILITY reply.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.caps
    }

    /// Whether `cap` is currently advertised.
    #[must_use]
    pub fn has_capability(&self, cap: &Capability) -> bool {
        self.caps.contains(cap)
    }

    /// Sends NOOP. Unsolicited data it brings in is discarded.
    pub async fn noop(&mut self) -> Result<()> {
        self.execute(Command::Noop).await.map(drop)
    }

    /// Asks for capabilities and stores the answer.
    pub async fn capability(&mut self) -> Result<&[Capability]> {
        let reply = self.execute(Command::Capability).await?;
        self.learn_capabilities(&reply);
        Ok(&self.caps)
    }

    /// Runs one command to completion.
    ///
    /// Literal arguments wait for the server's `+` before their bytes go
    /// out. A NO, BAD or BYE completion becomes the matching error; stray
    /// tagged lines for other tags are dropped.
    pub(crate) async fn execute(&mut self, command: Command) -> Result<Reply> {
        let tag = self.tags.next_tag();
        tracing::debug!(%tag, command = command.name(), "sending command");
        let request = command.encode(&tag);

        let mut reply = Reply::default();
        let Some((last, literals)) = request.parts().split_last() else {
            return Err(Error::Protocol(format!("empty request for {tag}")));
        };
        for part in literals {
            self.conn.send(part).await?;
            loop {
                let raw = self.conn.read_response().await?;
                match ResponseParser::parse(&raw)? {
                    Response::Continuation { .. } => break,
                    response => {
                        if let Some(done) = absorb(&tag, response, &mut reply) {
                            return done.map(|()| reply);
                        }
                    }
                }
            }
        }

        self.conn.send(last).await?;
        for raw in self.conn.read_through(&tag).await? {
            if let Some(done) = absorb(&tag, ResponseParser::parse(&raw)?, &mut reply) {
                return done.map(|()| reply);
            }
        }
        Err(Error::Protocol(format!("no completion for {tag}")))
    }

    pub(crate) fn learn_capabilities(&mut self, reply: &Reply) {
        if let Some(caps) = reply.capabilities() {
            self.caps = caps;
        }
    }

    /// Sends LOGOUT. A connection closed before the completion arrives
    /// still counts as logged out.
    pub(crate) async fn close(mut self) -> Result<()> {
        match self.execute(Command::Logout).await {
            Ok(_) | Err(Error::Io(_) | Error::Bye(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn into_state<Next>(self, state: Next) -> Client<S, Next> {
        Client {
            conn: self.conn,
            tags: self.tags,
            caps: self.caps,
            state,
        }
    }
}

/// Files one response into `reply`. Returns the outcome once `tag`
/// completes.
fn absorb(tag: &str, response: Response, reply: &mut Reply) -> Option<Result<()>> {
    match response {
        Response::Untagged(data) => reply.data.push(data),
        Response::Tagged {
            tag: got,
            status,
            code,
            text,
        } if got.as_str() == tag => {
            tracing::debug!(%tag, ?status, "completed");
            return Some(match status {
                Status::Ok | Status::PreAuth => {
                    reply.code = code;
                    Ok(())
                }
                Status::No => Err(Error::No(text)),
                Status::Bad => Err(Error::Bad(text)),
                Status::Bye => Err(Error::Bye(text)),
            });
        }
        Response::Tagged { .. } | Response::Continuation { .. } => {}
    }
    None
}

#[cfg(test)]
pub(crate) fn scripted<S, State>(stream: S, state: State) -> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    Client {
        conn: FramedStream::new(stream),
        tags: TagGenerator::new(),
        caps: Vec::new(),
        state,
    }
}
