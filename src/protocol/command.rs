//! Request line parsing
//!
//! A request is a verb followed by an optional name, separated by
//! whitespace. Tokens past the second are ignored. Verbs are case-sensitive.

use std::fmt;

/// Verb for looking up an entity description
pub const SEARCH: &str = "SEARCH";
/// Verb for playing an entity
pub const PLAY: &str = "PLAY";
/// Verb for ending the session
pub const QUIT: &str = "QUIT";

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SEARCH <name>`
    Search(String),
    /// `PLAY <name>`
    Play(String),
    /// `QUIT`
    Quit,
    /// Any other verb (possibly empty)
    Unknown(String),
}

impl Command {
    /// Parse one request line
    ///
    /// A missing name argument yields an empty name.
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().unwrap_or("");
        let name = tokens.next().unwrap_or("").to_string();

        match verb {
            SEARCH => Command::Search(name),
            PLAY => Command::Play(name),
            QUIT => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Protocol verb for this command
    pub fn verb(&self) -> &str {
        match self {
            Command::Search(_) => SEARCH,
            Command::Play(_) => PLAY,
            Command::Quit => QUIT,
            Command::Unknown(verb) => verb,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Search(name) | Command::Play(name) => write!(f, "{} {}", self.verb(), name),
            Command::Quit => f.write_str(QUIT),
            Command::Unknown(verb) => write!(f, "{} (unknown)", verb),
        }
    }
}
