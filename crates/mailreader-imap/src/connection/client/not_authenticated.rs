//! Greeting, STARTTLS and LOGIN.

use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::FramedStream;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, ResponseCode, Status};
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Reads the greeting from a freshly connected stream.
    ///
    /// OK and PREAUTH greetings are accepted; a `[CAPABILITY ...]` code on
    /// them is remembered. BYE becomes [`Error::Bye`].
    pub async fn greet(stream: S) -> Result<Self> {
        let mut conn = FramedStream::new(stream);
        let greeting = conn.read_response().await?;

        let caps = match ResponseParser::parse(&greeting)? {
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Ok | Status::PreAuth,
                code,
                ..
            }) => match code {
                Some(ResponseCode::Capability(caps)) => caps,
                _ => Vec::new(),
            },
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Bye,
                text,
                ..
            }) => return Err(Error::Bye(text)),
            other => {
                return Err(Error::Protocol(format!("unexpected greeting: {other:?}")));
            }
        };
        tracing::debug!(capabilities = caps.len(), "greeting received");

        Ok(Self {
            conn,
            tags: TagGenerator::new(),
            caps,
            state: NotAuthenticated,
        })
    }

    /// Negotiates STARTTLS, handing the bare stream to `upgrade` once the
    /// server agrees.
    ///
    /// Capabilities are forgotten across the upgrade; the tag counter keeps
    /// running.
    pub async fn starttls<F, Fut>(mut self, upgrade: F) -> Result<Self>
    where
        F: FnOnce(S) -> Fut,
        Fut: Future<Output = Result<S>>,
    {
        self.execute(Command::StartTls).await?;
        let secured = upgrade(self.conn.into_inner()).await?;
        Ok(Self {
            conn: FramedStream::new(secured),
            tags: self.tags,
            caps: Vec::new(),
            state: NotAuthenticated,
        })
    }

    /// LOGIN with a user name and password.
    ///
    /// Refused when the server advertises `LOGINDISABLED`. A NO completion
    /// becomes [`Error::Auth`].
    pub async fn login(mut self, username: &str, password: &str) -> Result<Client<S, Authenticated>> {
        if self.has_capability(&Capability::LoginDisabled) {
            return Err(Error::Auth("server advertises LOGINDISABLED".to_string()));
        }

        let login = Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        };
        let reply = match self.execute(login).await {
            Err(Error::No(text)) => return Err(Error::Auth(text)),
            other => other?,
        };
        self.learn_capabilities(&reply);
        tracing::debug!(username, "logged in");

        Ok(self.into_state(Authenticated))
    }

    /// Sends LOGOUT.
    pub async fn logout(self) -> Result<()> {
        self.close().await
    }
}
