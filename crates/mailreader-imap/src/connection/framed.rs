//! Response framing.
//!
//! A response is one line plus, for every line that ends in a `{n}`
//! literal marker, `n` raw bytes and the line that follows them. Literal
//! bytes are never inspected, so binary sections arrive intact.

use std::io;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

/// Longest accepted line, literals excluded.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Largest accepted literal.
const MAX_LITERAL_SIZE: usize = 100 * 1024 * 1024;

/// A stream read and written in whole protocol units.
pub struct FramedStream<S> {
    io: BufReader<S>,
    out: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            io: BufReader::with_capacity(8 * 1024, stream),
            out: BytesMut::with_capacity(1024),
        }
    }

    /// Writes one encoded command and flushes.
    ///
    /// # Errors
    ///
    /// Returns the write error.
    pub async fn send(&mut self, line: &[u8]) -> Result<()> {
        self.out.clear();
        self.out.put_slice(line);
        let stream = self.io.get_mut();
        stream.write_all(&self.out).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Reads one response with its literals.
    ///
    /// # Errors
    ///
    /// An I/O error on EOF or a failed read; [`Error::Protocol`] when a
    /// line or literal exceeds its limit.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();
        loop {
            let line_start = response.len();
            self.read_line(&mut response).await?;
            let Some(len) = literal_length(&response[line_start..]) else {
                return Ok(response);
            };
            if len > MAX_LITERAL_SIZE {
                return Err(Error::Protocol(format!(
                    "literal too large: {len} bytes (limit {MAX_LITERAL_SIZE})"
                )));
            }
            let data_start = response.len();
            response.resize(data_start + len, 0);
            self.io.read_exact(&mut response[data_start..]).await?;
        }
    }

    /// Reads responses until the completion for `tag`, which ends the
    /// returned list.
    ///
    /// # Errors
    ///
    /// Same as [`read_response`](Self::read_response).
    pub async fn read_through(&mut self, tag: &str) -> Result<Vec<Vec<u8>>> {
        let mut responses = Vec::new();
        loop {
            let response = self.read_response().await?;
            let done = completes(&response, tag);
            responses.push(response);
            if done {
                return Ok(responses);
            }
        }
    }

    /// Gives back the stream. Buffered unread input is lost.
    pub fn into_inner(self) -> S {
        self.io.into_inner()
    }

    /// Appends one `\n`-terminated line to `buf`.
    async fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        let limit = u64::try_from(MAX_LINE_LENGTH).unwrap_or(u64::MAX);
        let read = (&mut self.io).take(limit).read_until(b'\n', buf).await?;
        if buf.last() == Some(&b'\n') {
            return Ok(());
        }
        if read < MAX_LINE_LENGTH {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-response",
            )));
        }
        Err(Error::Protocol(format!("line too long (limit {MAX_LINE_LENGTH})")))
    }
}

/// `n` for a line ending in `{n}` or `{n+}` followed by CRLF.
fn literal_length(line: &[u8]) -> Option<usize> {
    let marker = line.strip_suffix(b"}\r\n")?;
    let marker = marker.strip_suffix(b"+").unwrap_or(marker);
    let open = marker.iter().rposition(|&b| b == b'{')?;
    let digits = &marker[open + 1..];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn completes(response: &[u8], tag: &str) -> bool {
    response
        .strip_prefix(tag.as_bytes())
        .is_some_and(|rest| rest.starts_with(b" "))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;

    fn framed(mock: tokio_test::io::Mock) -> FramedStream<tokio_test::io::Mock> {
        FramedStream::new(mock)
    }

    #[test]
    fn literal_markers() {
        assert_eq!(literal_length(b"* 1 FETCH (BODY[1] {123}\r\n"), Some(123));
        assert_eq!(literal_length(b"A0001 LOGIN {5+}\r\n"), Some(5));
        assert_eq!(literal_length(b"{0}\r\n"), Some(0));
        assert_eq!(literal_length(b"* OK {12} inside text\r\n"), None);
        assert_eq!(literal_length(b"x {abc}\r\n"), None);
        assert_eq!(literal_length(b"x {}\r\n"), None);
        assert_eq!(literal_length(b"x {12}"), None);
    }

    #[test]
    fn completion_needs_exact_tag() {
        assert!(completes(b"A0001 OK done\r\n", "A0001"));
        assert!(!completes(b"A00012 OK done\r\n", "A0001"));
        assert!(!completes(b"* OK A0001\r\n", "A0001"));
    }

    #[tokio::test]
    async fn crlf_split_between_reads() {
        let mut stream = framed(Builder::new().read(b"* OK ready\r").read(b"\n").build());
        assert_eq!(stream.read_response().await.unwrap(), b"* OK ready\r\n");
    }

    #[tokio::test]
    async fn binary_literal_passes_through() {
        let mut stream = framed(
            Builder::new()
                .read(b"* 1 FETCH (BODY[2] {4}\r\n")
                .read(&[0xff, 0x00, b'\r', b'\n'])
                .read(b")\r\n")
                .build(),
        );
        let mut expected = b"* 1 FETCH (BODY[2] {4}\r\n".to_vec();
        expected.extend_from_slice(&[0xff, 0x00, b'\r', b'\n', b')', b'\r', b'\n']);
        assert_eq!(stream.read_response().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn several_literals_in_one_response() {
        let wire = b"* 1 FETCH (BODY[1] {2}\r\nhi BODY[2] {3}\r\nyo!)\r\n";
        let mut stream = framed(Builder::new().read(wire).build());
        assert_eq!(stream.read_response().await.unwrap(), wire.to_vec());
    }

    #[tokio::test]
    async fn read_through_stops_at_tag() {
        let mut stream = framed(
            Builder::new()
                .write(b"A0000 NOOP\r\n")
                .read(b"* 3 EXISTS\r\nA0000 OK NOOP completed\r\n")
                .build(),
        );
        stream.send(b"A0000 NOOP\r\n").await.unwrap();
        let responses = stream.read_through("A0000").await.unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1], b"A0000 OK NOOP completed\r\n");
    }

    #[tokio::test]
    async fn eof_before_completion_is_io_error() {
        let mut stream = framed(Builder::new().read(b"* BYE shutting down\r\n").build());
        let err = stream.read_through("A0000").await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn oversized_literal_is_refused() {
        let header = format!("* 1 FETCH (BODY[] {{{}}}\r\n", MAX_LITERAL_SIZE + 1);
        let mut stream = framed(Builder::new().read(header.as_bytes()).build());
        let err = stream.read_response().await.unwrap_err();
        assert!(err.to_string().contains("literal too large"));
    }

    #[tokio::test]
    async fn overlong_line_is_refused() {
        let line = "A".repeat(MAX_LINE_LENGTH);
        let mut stream = framed(Builder::new().read(line.as_bytes()).build());
        let err = stream.read_response().await.unwrap_err();
        assert!(err.to_string().contains("line too long"));
    }
}
