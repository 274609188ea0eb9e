//! Newline-delimited JSON transport.
//!
//! - Messages are UTF-8 encoded JSON-RPC, one per line
//! - Messages must not contain embedded newlines
//! - In production the reader is stdin and the writer is stdout; stderr is
//!   left for logging
//!
//! The transport is generic over any async reader/writer pair so sessions can
//! also run over in-memory pipes.

use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Line-framed transport over an async reader and writer.
#[derive(Debug)]
pub struct LineTransport<R, W> {
    /// Buffered reader for incoming messages.
    reader: BufReader<R>,
    /// Sink for outgoing messages.
    writer: W,
}

/// One line received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A UTF-8 line, terminator stripped.
    Line(String),
    /// A line whose bytes were not valid UTF-8.
    InvalidUtf8,
}

/// The stdio transport used by the server binary.
pub type StdioTransport = LineTransport<tokio::io::Stdin, tokio::io::Stdout>;

impl StdioTransport {
    /// Creates a transport reading stdin and writing stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over the given reader and writer.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next message line, without its line terminator.
    ///
    /// Returns `None` once the reader is closed (EOF). A line that is not
    /// valid UTF-8 is returned as [`Frame::InvalidUtf8`] so the session can
    /// answer it and carry on.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<Frame>> {
        let mut bytes = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut bytes).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }

        Ok(Some(
            String::from_utf8(bytes).map_or(Frame::InvalidUtf8, Frame::Line),
        ))
    }

    /// Serialises `message` to JSON and writes it as a single line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_message<T: Serialize>(&mut self, message: &T) -> io::Result<()> {
        let mut encoded = serde_json::to_vec(message)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Compact serde_json output never contains raw newlines.
        debug_assert!(
            !encoded.contains(&b'\n'),
            "JSON message must not contain embedded newlines"
        );

        encoded.push(b'\n');
        self.writer.write_all(&encoded).await?;
        self.writer.flush().await?;

        Ok(())
    }
}
