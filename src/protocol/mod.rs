//! Line-based request protocol
//!
//! ```text
//! Request:  "<VERB> [<name>]\n"
//! Response: "<single line>\n"
//! ```
//!
//! Verbs are `SEARCH <name>`, `PLAY <name>` and `QUIT`. Anything else gets
//! an `Unknown command` reply. Line terminators belong to the transport;
//! response payloads never contain CR or LF.

pub mod command;
pub mod dispatcher;

pub use command::Command;
pub use dispatcher::{sanitize, CommandDispatcher, Response, CLOSING_MESSAGE};
