//! The sequential request/response loop over the stdio transport.
//!
//! Reads one line at a time, dispatches it, writes the response, and
//! repeats until the input stream closes or a termination signal
//! arrives. Processing is strictly sequential, so responses leave in
//! the exact order their requests arrived.

use std::io;

use crate::rpc::dispatcher::Dispatcher;
use crate::rpc::envelope::{parse_request, ErrorData, ParseFailure, ResponseEnvelope};
use crate::rpc::transport::{StdioTransport, Transport};

/// The stdio protocol server: transport plus dispatcher.
pub struct RpcServer {
    transport: StdioTransport,
    dispatcher: Dispatcher,
}

impl RpcServer {
    /// Creates a server over stdin/stdout.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            transport: Transport::stdio(),
            dispatcher,
        }
    }

    /// Runs the request loop with graceful shutdown handling.
    ///
    /// Returns when the input stream reaches EOF or a termination
    /// signal is received.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: io::Result<Option<String>>,
    ) -> io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::info!("input stream closed, shutting down");
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        self.handle_line(&line).await?;

        Ok(false)
    }

    /// Handles a single line of input.
    ///
    /// A malformed line never terminates the loop: when the request id
    /// is recoverable the error goes back in-band, otherwise it is
    /// logged and the line discarded.
    async fn handle_line(&mut self, line: &str) -> io::Result<()> {
        match parse_request(line) {
            Ok(request) => {
                let response = self.dispatcher.handle(&request);
                self.transport.write_response(&response).await
            }
            Err(ParseFailure { id: Some(id), reason }) => {
                let response =
                    ResponseEnvelope::failure(Some(id), ErrorData::malformed(&reason));
                self.transport.write_response(&response).await
            }
            Err(ParseFailure { id: None, reason }) => {
                tracing::warn!(%reason, "discarding malformed message");
                Ok(())
            }
        }
    }
}
