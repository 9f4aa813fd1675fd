//! Session management
//!
//! A session is one client connection's lifetime. Requests inside a session
//! are handled independently; the session only tracks lifecycle and counters.

pub mod state;

pub use state::{CloseReason, SessionPhase, SessionState};
