//! Newline-delimited JSON framing over a duplex byte stream.
//!
//! - Messages are UTF-8 encoded JSON objects
//! - Messages are delimited by newlines
//! - Messages must not contain embedded newlines
//! - stdin: receives messages from the client
//! - stdout: sends messages to the client
//! - stderr: may be used for logging (never for protocol frames)
//!
//! The transport is generic over the underlying streams so tests can
//! drive it with in-memory pipes; production uses [`Transport::stdio`].

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::rpc::envelope::ResponseEnvelope;

/// A newline-delimited JSON message transport.
pub struct Transport<R, W> {
    /// Buffered reader for the inbound stream.
    reader: BufReader<R>,
    /// Handle for the outbound stream.
    writer: W,
}

/// The production transport over stdin/stdout.
pub type StdioTransport = Transport<tokio::io::Stdin, tokio::io::Stdout>;

impl Transport<tokio::io::Stdin, tokio::io::Stdout> {
    /// Creates the stdio transport.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over arbitrary streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next message line from the inbound stream.
    ///
    /// Returns `None` when the stream is closed (EOF).
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // EOF - input closed
            return Ok(None);
        }

        // Remove the trailing newline
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Writes a response envelope as one newline-terminated line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_response(&mut self, response: &ResponseEnvelope) -> io::Result<()> {
        let json = serde_json::to_string(response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.write_raw(&json).await
    }

    /// Writes a raw JSON string with newline termination.
    ///
    /// The write is flushed per message, so a frame is never
    /// interleaved with another frame's bytes.
    async fn write_raw(&mut self, json: &str) -> io::Result<()> {
        // Framing invariant: one message per line
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }
}
