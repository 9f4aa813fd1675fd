//! Error types
//!
//! A lookup miss is the only domain error. Its `Display` output is the text
//! sent back to protocol clients, so it doubles as the user-facing message.

use std::fmt;
use std::io;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for registry and server operations
#[derive(Debug)]
pub enum Error {
    /// No entity registered under this name (or the handle went stale)
    EntityNotFound(String),
    /// No group registered under this name (or the handle went stale)
    GroupNotFound(String),
    /// A request line exceeded the configured maximum length
    LineTooLong { limit: usize },
    /// Transport I/O failure
    Io(io::Error),
}

impl Error {
    /// Whether this error is a name lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntityNotFound(_) | Error::GroupNotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EntityNotFound(name) => write!(f, "Objet '{}' introuvable.", name),
            Error::GroupNotFound(name) => write!(f, "Groupe '{}' introuvable.", name),
            Error::LineTooLong { limit } => {
                write!(f, "Request line exceeds {} bytes", limit)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
