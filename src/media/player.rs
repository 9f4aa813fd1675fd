//! Play-action capability
//!
//! Opening a file is delegated to an external program. The call is
//! fire-and-forget: spawn failures are logged, never returned.

use std::process::Stdio;

/// Opens a media file for the user
pub trait Player: Send + Sync {
    /// Open `file`; must not block on the opened program
    fn open(&self, file: &str);
}

/// Player that does nothing
///
/// Useful for headless deployments where nothing can be displayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayer;

impl Player for NullPlayer {
    fn open(&self, file: &str) {
        tracing::trace!(file = file, "Play request ignored");
    }
}

/// Player that launches an OS program with the file as last argument
#[derive(Debug, Clone)]
pub struct SystemPlayer {
    program: String,
    args: Vec<String>,
}

impl SystemPlayer {
    /// Use `program` to open files
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add a leading argument placed before the file name
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program used to open files
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Leading arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for SystemPlayer {
    #[cfg(target_os = "windows")]
    fn default() -> Self {
        SystemPlayer::new("cmd").arg("/C").arg("start").arg("")
    }

    #[cfg(target_os = "macos")]
    fn default() -> Self {
        SystemPlayer::new("open")
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn default() -> Self {
        SystemPlayer::new("xdg-open")
    }
}

impl Player for SystemPlayer {
    fn open(&self, file: &str) {
        // Outside a runtime there is no reaper for the child; skip instead of panicking
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!(
                program = %self.program,
                file = file,
                "No async runtime, play request dropped"
            );
            return;
        }

        let result = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match result {
            Ok(child) => {
                tracing::debug!(
                    program = %self.program,
                    file = file,
                    pid = ?child.id(),
                    "Player launched"
                );
                // Dropping the child detaches it; tokio reaps it in the background
            }
            Err(e) => {
                tracing::warn!(
                    program = %self.program,
                    file = file,
                    error = %e,
                    "Failed to launch player"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_player_builder() {
        let player = SystemPlayer::new("mpv").arg("--fs");

        assert_eq!(player.program(), "mpv");
        assert_eq!(player.args(), ["--fs".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_program_is_not_fatal() {
        let player = SystemPlayer::new("definitely-not-a-real-player-binary");
        player.open("montsouris.jpg");
    }

    #[test]
    fn test_open_without_runtime_is_not_fatal() {
        SystemPlayer::new("true").open("video.mp4");
        NullPlayer.open("video.mp4");
    }
}
