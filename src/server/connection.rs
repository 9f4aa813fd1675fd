//! Per-session connection handler
//!
//! Reads newline-terminated requests, hands each to the dispatcher and
//! writes back one newline-terminated response. The session ends on QUIT,
//! end of stream, idle timeout or an over-long request line.

use std::net::SocketAddr;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::protocol::CommandDispatcher;
use crate::server::config::ServerConfig;
use crate::session::{CloseReason, SessionState};

enum ReadOutcome {
    Line(String),
    Eof,
    IdleTimeout,
}

/// One client session over any byte stream
pub struct Connection<S> {
    stream: S,
    state: SessionState,
    config: ServerConfig,
    dispatcher: CommandDispatcher,
    read_buf: BytesMut,
    /// Bytes of `read_buf` already searched for a newline
    scanned: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new connection handler
    pub fn new(
        session_id: u64,
        stream: S,
        peer_addr: Option<SocketAddr>,
        config: ServerConfig,
        dispatcher: CommandDispatcher,
    ) -> Self {
        let read_buf = BytesMut::with_capacity(config.read_buffer_size);
        Self {
            stream,
            state: SessionState::new(session_id, peer_addr),
            config,
            dispatcher,
            read_buf,
            scanned: 0,
        }
    }

    /// Session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Serve requests until the session ends
    pub async fn run(&mut self) -> Result<()> {
        let result = self.request_loop().await;

        if let Err(ref e) = result {
            let reason = match e {
                Error::LineTooLong { .. } => CloseReason::LineTooLong,
                _ => CloseReason::Error,
            };
            self.state.close(reason);
        }

        // Peer may already be gone
        let _ = self.stream.shutdown().await;
        self.state.finish();

        tracing::debug!(
            session_id = self.state.id,
            requests = self.state.requests,
            bytes_in = self.state.bytes_received,
            bytes_out = self.state.bytes_sent,
            duration_ms = self.state.duration().as_millis() as u64,
            reason = ?self.state.close_reason,
            "Session ended"
        );

        result
    }

    async fn request_loop(&mut self) -> Result<()> {
        while self.state.is_open() {
            let line = match self.read_line().await? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof => {
                    self.state.close(CloseReason::Disconnected);
                    break;
                }
                ReadOutcome::IdleTimeout => {
                    tracing::debug!(session_id = self.state.id, "Idle timeout");
                    self.state.close(CloseReason::IdleTimeout);
                    break;
                }
            };

            tracing::debug!(session_id = self.state.id, request = %line, "Request received");

            let response = self.dispatcher.handle(&line).await;
            let written = self.write_line(&response.text).await?;
            self.state.on_request(written);

            if !response.keep_open {
                self.state.close(CloseReason::Quit);
            }
        }

        Ok(())
    }

    /// Read the next request line, without its terminator
    async fn read_line(&mut self) -> Result<ReadOutcome> {
        let limit = self.config.max_line_length;

        loop {
            if let Some(offset) = self.read_buf[self.scanned..]
                .iter()
                .position(|&b| b == b'\n')
            {
                let end = self.scanned + offset;
                let line = self.take_line(end);
                self.read_buf.advance(1); // '\n'
                return line.map(ReadOutcome::Line);
            }
            self.scanned = self.read_buf.len();

            // One byte of slack for a trailing '\r'
            if self.read_buf.len() > limit + 1 {
                return Err(Error::LineTooLong { limit });
            }

            match self.fill_buf().await? {
                Some(0) => {
                    if self.read_buf.is_empty() {
                        return Ok(ReadOutcome::Eof);
                    }
                    // Final line without terminator
                    let end = self.read_buf.len();
                    return self.take_line(end).map(ReadOutcome::Line);
                }
                Some(_) => {}
                None => return Ok(ReadOutcome::IdleTimeout),
            }
        }
    }

    /// Split `read_buf[..end]` off as a decoded line
    fn take_line(&mut self, end: usize) -> Result<String> {
        let mut raw = self.read_buf.split_to(end);
        self.scanned = 0;

        if raw.last() == Some(&b'\r') {
            raw.truncate(raw.len() - 1);
        }

        if raw.len() > self.config.max_line_length {
            return Err(Error::LineTooLong {
                limit: self.config.max_line_length,
            });
        }

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Read more bytes; `None` means the idle timeout elapsed
    async fn fill_buf(&mut self) -> Result<Option<usize>> {
        self.read_buf.reserve(self.config.read_buffer_size);

        let read = self.stream.read_buf(&mut self.read_buf);
        let n = match self.config.idle_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, read).await {
                Ok(result) => result?,
                Err(_) => return Ok(None),
            },
            None => read.await?,
        };

        self.state.add_bytes_received(n);
        Ok(Some(n))
    }

    /// Write one response line; returns the bytes written
    async fn write_line(&mut self, text: &str) -> Result<usize> {
        let mut out = Vec::with_capacity(text.len() + 1);
        out.extend_from_slice(text.as_bytes());
        out.push(b'\n');

        self.stream.write_all(&out).await?;
        self.stream.flush().await?;
        Ok(out.len())
    }
}
