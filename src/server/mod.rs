//! TCP transport for the line protocol
//!
//! One tokio task per connection. Each task reads request lines, passes them
//! to the shared [`CommandDispatcher`](crate::protocol::CommandDispatcher) and
//! writes back one response line per request.

pub mod config;
pub mod connection;
pub mod listener;

pub use config::ServerConfig;
pub use connection::Connection;
pub use listener::MediaServer;
