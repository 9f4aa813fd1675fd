//! Session state machine
//!
//! Tracks one client connection from accept to close.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// TCP connected, no request yet
    Connected,
    /// At least one request handled
    Active,
    /// QUIT received or transport failed; final response may still be in flight
    Closing,
    /// Session closed
    Closed,
}

/// Reason a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Client sent QUIT
    Quit,
    /// Client closed its end of the connection
    Disconnected,
    /// No request arrived within the idle timeout
    IdleTimeout,
    /// Request line exceeded the configured limit
    LineTooLong,
    /// Transport I/O error
    Error,
}

/// Complete session state
#[derive(Debug)]
pub struct SessionState {
    /// Unique session ID
    pub id: u64,

    /// Remote peer address (None for in-memory transports)
    pub peer_addr: Option<SocketAddr>,

    /// Current phase
    pub phase: SessionPhase,

    /// Connection start time
    pub connected_at: Instant,

    /// Number of requests handled
    pub requests: u64,

    /// Bytes received, line terminators included
    pub bytes_received: u64,

    /// Bytes sent, line terminators included
    pub bytes_sent: u64,

    /// Why the session ended, once it has
    pub close_reason: Option<CloseReason>,
}

impl SessionState {
    /// Create a new session state
    pub fn new(id: u64, peer_addr: Option<SocketAddr>) -> Self {
        Self {
            id,
            peer_addr,
            phase: SessionPhase::Connected,
            connected_at: Instant::now(),
            requests: 0,
            bytes_received: 0,
            bytes_sent: 0,
            close_reason: None,
        }
    }

    /// Record a handled request and the response size
    pub fn on_request(&mut self, response_len: usize) {
        self.requests += 1;
        self.bytes_sent += response_len as u64;
        if self.phase == SessionPhase::Connected {
            self.phase = SessionPhase::Active;
        }
    }

    /// Record raw bytes read from the transport
    pub fn add_bytes_received(&mut self, bytes: usize) {
        self.bytes_received += bytes as u64;
    }

    /// Start closing the session
    pub fn close(&mut self, reason: CloseReason) {
        if self.close_reason.is_none() {
            self.close_reason = Some(reason);
        }
        if self.phase != SessionPhase::Closed {
            self.phase = SessionPhase::Closing;
        }
    }

    /// Mark the session closed
    pub fn finish(&mut self) {
        if self.close_reason.is_none() {
            self.close_reason = Some(CloseReason::Disconnected);
        }
        self.phase = SessionPhase::Closed;
    }

    /// Check if the session still accepts requests
    pub fn is_open(&self) -> bool {
        matches!(self.phase, SessionPhase::Connected | SessionPhase::Active)
    }

    /// Get session duration
    pub fn duration(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
