//! Session against replayed server transcripts.

use std::future::Future;
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use mailreader_imap::{
    BodyStructure, Config, Connector, Error, FetchItem, FetchItems, Flag, Result, SearchCriteria,
    Security, SequenceSet, Session, SessionConfig,
};

/// Replays a fixed server transcript and records what the client wrote.
struct Transcript {
    server: Cursor<Vec<u8>>,
    client: Arc<Mutex<Vec<u8>>>,
}

impl AsyncRead for Transcript {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.server).poll_read(cx, buf)
    }
}

impl AsyncWrite for Transcript {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.client.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Serves a single transcript; a second connect is refused.
struct Replay {
    script: Mutex<Option<Vec<u8>>>,
    written: Arc<Mutex<Vec<u8>>>,
}

impl Replay {
    fn new(script: &[u8]) -> Self {
        Self {
            script: Mutex::new(Some(script.to_vec())),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn written(&self) -> Arc<Mutex<Vec<u8>>> {
        Arc::clone(&self.written)
    }
}

impl Connector for Replay {
    type Stream = Transcript;

    fn open(&self, _config: &Config) -> impl Future<Output = Result<Transcript>> + Send {
        let script = self.script.lock().unwrap().take();
        let client = Arc::clone(&self.written);
        async move {
            let script = script
                .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionRefused, "transcript used up"))?;
            Ok(Transcript {
                server: Cursor::new(script),
                client,
            })
        }
    }

    fn upgrade(
        &self,
        stream: Transcript,
        _config: &Config,
    ) -> impl Future<Output = Result<Transcript>> + Send {
        async move { Ok(stream) }
    }
}

fn session(connector: Replay) -> Session<Replay> {
    let server = Config::new("imap.example.com").security(Security::Implicit);
    Session::new(connector, SessionConfig::new(server, "alice", "secret"))
}

fn commands(log: &Mutex<Vec<u8>>) -> Vec<String> {
    String::from_utf8_lossy(&log.lock().unwrap())
        .lines()
        .map(str::to_string)
        .collect()
}

const LOGIN_AND_SELECT: &[u8] = b"* OK [CAPABILITY IMAP4rev1] ready\r\n\
A0000 OK Logged in\r\n\
* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n\
* 3 EXISTS\r\n\
* 0 RECENT\r\n\
A0001 OK [READ-WRITE] SELECT completed\r\n";

fn script(rest: &[u8]) -> Vec<u8> {
    let mut all = LOGIN_AND_SELECT.to_vec();
    all.extend_from_slice(rest);
    all
}

#[tokio::test]
async fn connect_list_and_disconnect() {
    let connector = Replay::new(&script(
        b"* LIST (\\HasNoChildren) \"/\" INBOX\r\n\
* LIST (\\HasNoChildren) \"/\" \"Sent Items\"\r\n\
A0002 OK LIST completed\r\n\
* BYE Logging out\r\n\
A0003 OK LOGOUT completed\r\n",
    ));
    let log = connector.written();
    let mut session = session(connector);

    let status = session.connect("INBOX").await.unwrap();
    assert_eq!(status.exists, 3);

    let names: Vec<String> = session
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.mailbox.as_str().to_string())
        .collect();
    assert_eq!(names, vec!["INBOX", "Sent Items"]);

    session.disconnect().await;
    session.disconnect().await;
    assert!(!session.is_connected());

    assert_eq!(
        commands(&log),
        vec![
            "A0000 LOGIN alice secret",
            "A0001 SELECT INBOX",
            "A0002 LIST \"\" \"*\"",
            "A0003 LOGOUT",
        ]
    );
}

#[tokio::test]
async fn search_then_fetch_overview() {
    let connector = Replay::new(&script(
        b"* SEARCH 1 3\r\n\
A0002 OK SEARCH completed\r\n\
* 3 FETCH (UID 103 FLAGS (\\Seen \\Flagged) RFC822.SIZE 2048 ENVELOPE (\"Mon, 1 Jan 2024 10:00:00 +0000\" \"=?UTF-8?B?SGVsbG8=?=\" ((\"Bob\" NIL \"bob\" \"example.com\")) NIL NIL ((NIL NIL \"alice\" \"example.com\")) NIL NIL NIL \"<3@example.com>\"))\r\n\
* 1 FETCH (UID 101 FLAGS () RFC822.SIZE 512 ENVELOPE (NIL {5}\r\nHello NIL NIL NIL NIL NIL NIL NIL NIL))\r\n\
A0003 OK FETCH completed\r\n",
    ));
    let log = connector.written();
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();

    let ids = session
        .search(SearchCriteria::From("bob".to_string()).and(SearchCriteria::Unseen))
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let set = SequenceSet::from_numbers(&[3, 1]).unwrap();
    let rows = session.fetch(&set, FetchItems::overview()).await.unwrap();
    assert_eq!(rows.len(), 2);

    let envelope = rows[0]
        .1
        .iter()
        .find_map(|item| match item {
            FetchItem::Envelope(env) => Some(env),
            _ => None,
        })
        .unwrap();
    assert_eq!(envelope.subject.as_deref(), Some("=?UTF-8?B?SGVsbG8=?="));
    assert_eq!(envelope.from[0].email().as_deref(), Some("bob@example.com"));

    let second_subject = rows[1].1.iter().find_map(|item| match item {
        FetchItem::Envelope(env) => env.subject.clone(),
        _ => None,
    });
    assert_eq!(second_subject.as_deref(), Some("Hello"));

    let sent = commands(&log);
    assert_eq!(sent[2], "A0002 SEARCH FROM \"bob\" UNSEEN");
    assert_eq!(sent[3], "A0003 FETCH 3,1 (UID FLAGS ENVELOPE RFC822.SIZE)");
    assert!(!sent.iter().any(|line| line.contains("BODYSTRUCTURE")));
}

#[tokio::test]
async fn fetch_bodystructure_and_section() {
    let connector = Replay::new(&script(
        b"* 2 FETCH (BODYSTRUCTURE ((\"TEXT\" \"PLAIN\" (\"CHARSET\" \"utf-8\") NIL NIL \"7BIT\" 12 1 NIL NIL NIL)(\"APPLICATION\" \"PDF\" (\"NAME\" \"invoice.pdf\") NIL NIL \"BASE64\" 8 NIL (\"ATTACHMENT\" (\"FILENAME\" \"invoice.pdf\")) NIL) \"MIXED\" (\"BOUNDARY\" \"xyz\") NIL NIL))\r\n\
A0002 OK FETCH completed\r\n\
* 2 FETCH (BODY[2] {8}\r\nJVBERi0x)\r\n\
A0003 OK FETCH completed\r\n",
    ));
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();

    let set = SequenceSet::single(2).unwrap();
    let rows = session
        .fetch(&set, FetchItems::structure())
        .await
        .unwrap();
    let structure = rows[0]
        .1
        .iter()
        .find_map(|item| match item {
            FetchItem::BodyStructure(s) => Some(s),
            _ => None,
        })
        .unwrap();
    let BodyStructure::Multipart { parts, subtype, .. } = structure else {
        panic!("expected multipart");
    };
    assert_eq!(subtype, "MIXED");
    assert_eq!(parts.len(), 2);
    assert!(parts[1].disposition().unwrap().is_attachment());

    let rows = session
        .fetch(&set, FetchItems::section("2"))
        .await
        .unwrap();
    let data = rows[0]
        .1
        .iter()
        .find_map(|item| match item {
            FetchItem::Section { data, .. } => data.clone(),
            _ => None,
        })
        .unwrap();
    assert_eq!(data, b"JVBERi0x");
}

#[tokio::test]
async fn delete_and_expunge() {
    let connector = Replay::new(&script(
        b"* 2 FETCH (FLAGS (\\Deleted))\r\n\
A0002 OK STORE completed\r\n\
* 2 EXPUNGE\r\n\
A0003 OK EXPUNGE completed\r\n\
A0004 OK EXPUNGE completed\r\n",
    ));
    let log = connector.written();
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();

    let set = SequenceSet::single(2).unwrap();
    session
        .add_flags(&set, &[Flag::Deleted])
        .await
        .unwrap();
    assert_eq!(session.expunge().await.unwrap().len(), 1);
    assert!(session.expunge().await.unwrap().is_empty());

    let sent = commands(&log);
    assert_eq!(sent[2], "A0002 STORE 2 +FLAGS (\\Deleted)");
    assert_eq!(sent[3], "A0003 EXPUNGE");
}

#[tokio::test]
async fn store_refused() {
    let connector = Replay::new(&script(b"A0002 NO [READ-ONLY] Mailbox is read-only\r\n"));
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();

    let set = SequenceSet::single(1).unwrap();
    let err = session
        .add_flags(&set, &[Flag::Deleted])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::No(_)));
}

#[tokio::test]
async fn greeting_bye_fails_connect() {
    let connector = Replay::new(b"* BYE Server shutting down\r\n");
    let mut session = session(connector);

    let err = session.connect("INBOX").await.unwrap_err();
    assert!(matches!(err, Error::Bye(_)));
    assert!(!session.is_connected());
}

#[tokio::test]
async fn server_drop_mid_command() {
    let connector = Replay::new(&script(b"* SEARCH 1\r\n"));
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();

    let err = session.search(SearchCriteria::All).await.unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!session.is_connected());
    assert!(matches!(session.search(SearchCriteria::All).await, Err(Error::NotConnected)));
}

#[tokio::test]
async fn search_term_with_line_break_goes_out_as_literal() {
    let connector = Replay::new(&script(
        b"+ Ready for literal data\r\n* SEARCH 2\r\nA0002 OK SEARCH completed\r\n",
    ));
    let written = connector.written();
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();
    written.lock().unwrap().clear();

    let hits = session
        .search(SearchCriteria::Text("x\r\nA9 DELETE INBOX".into()))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(
        written.lock().unwrap().as_slice(),
        b"A0002 SEARCH TEXT {18}\r\nx\r\nA9 DELETE INBOX\r\n"
    );
}

#[tokio::test]
async fn accented_search_declares_utf8() {
    let connector = Replay::new(&script(
        b"+ go ahead\r\n* SEARCH 3\r\nA0002 OK SEARCH completed\r\n",
    ));
    let written = connector.written();
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();
    written.lock().unwrap().clear();

    session
        .search(SearchCriteria::Subject("café".into()))
        .await
        .unwrap();
    assert_eq!(
        written.lock().unwrap().as_slice(),
        "A0002 SEARCH CHARSET UTF-8 SUBJECT {5}\r\ncafé\r\n".as_bytes()
    );
}

#[tokio::test]
async fn disconnect_after_server_hangup() {
    let connector = Replay::new(LOGIN_AND_SELECT);
    let mut session = session(connector);
    session.connect("INBOX").await.unwrap();

    session.disconnect().await;
    assert!(!session.is_connected());
    assert!(matches!(session.list().await, Err(Error::NotConnected)));
}
