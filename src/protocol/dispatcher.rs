//! Command dispatch
//!
//! Maps one request line to one registry operation and formats a single-line
//! response. The dispatcher keeps no per-request state, so a single instance
//! is shared by every session.

use std::sync::Arc;

use crate::registry::MediaRegistry;

use super::command::Command;

/// Response sent for `QUIT`
pub const CLOSING_MESSAGE: &str = "Closing server...";

/// Outcome of handling one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response text, guaranteed free of CR and LF
    pub text: String,
    /// Whether the session should keep reading requests
    pub keep_open: bool,
}

impl Response {
    fn reply(text: impl AsRef<str>) -> Self {
        Self {
            text: sanitize(text.as_ref()),
            keep_open: true,
        }
    }

    fn close(text: impl AsRef<str>) -> Self {
        Self {
            text: sanitize(text.as_ref()),
            keep_open: false,
        }
    }
}

/// Replace every CR and LF with a single space
pub fn sanitize(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Shared request handler backed by a registry
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    registry: Arc<MediaRegistry>,
}

impl CommandDispatcher {
    /// Create a dispatcher over `registry`
    pub fn new(registry: Arc<MediaRegistry>) -> Self {
        Self { registry }
    }

    /// Get a reference to the registry
    pub fn registry(&self) -> &Arc<MediaRegistry> {
        &self.registry
    }

    /// Parse and execute one request line
    pub async fn handle(&self, line: &str) -> Response {
        self.execute(Command::parse(line)).await
    }

    /// Execute an already parsed command
    pub async fn execute(&self, command: Command) -> Response {
        match command {
            // A missing argument is a lookup of the empty name
            Command::Search(name) => {
                let result = self.registry.describe(&name).await;
                Response::reply(result.unwrap_or_else(|e| e.to_string()))
            }
            Command::Play(name) => {
                let result = self.registry.play(&name).await;
                Response::reply(result.unwrap_or_else(|e| e.to_string()))
            }
            Command::Quit => Response::close(CLOSING_MESSAGE),
            Command::Unknown(verb) => Response::reply(format!("Unknown command: {}", verb)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn dispatcher() -> CommandDispatcher {
        let registry = Arc::new(MediaRegistry::headless());
        registry
            .create_photo("Photo1", "montsouris.jpg", 48.8, 2.3)
            .await;
        registry.create_video("Video1", "video.mp4", 120u32).await;
        CommandDispatcher::new(registry)
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a\nb\r\nc"), "a b  c");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[tokio::test]
    async fn test_search() {
        let dispatcher = dispatcher().await;

        let response = dispatcher.handle("SEARCH Photo1").await;
        assert_eq!(
            response.text,
            "Nom : Photo1 | Fichier : montsouris.jpg | Latitude: 48.8 | Longitude: 2.3"
        );
        assert!(response.keep_open);
    }

    #[tokio::test]
    async fn test_search_not_found() {
        let dispatcher = dispatcher().await;

        let response = dispatcher.handle("SEARCH Nope").await;
        assert_eq!(response.text, "Objet 'Nope' introuvable.");
        assert!(response.keep_open);

        let response = dispatcher.handle("SEARCH").await;
        assert_eq!(response.text, "Objet '' introuvable.");
    }

    #[tokio::test]
    async fn test_play() {
        let dispatcher = dispatcher().await;

        let response = dispatcher.handle("PLAY Video1").await;
        assert_eq!(response.text, "Playing video: video.mp4 (Duration: 120s)");
        assert!(response.keep_open);

        let response = dispatcher.handle("PLAY Photo1").await;
        assert_eq!(response.text, "Opening photo: montsouris.jpg");

        let response = dispatcher.handle("PLAY Ghost").await;
        assert_eq!(response.text, "Objet 'Ghost' introuvable.");
    }

    #[tokio::test]
    async fn test_missing_argument_looks_up_empty_name() {
        let registry = Arc::new(MediaRegistry::headless());
        let dispatcher = CommandDispatcher::new(Arc::clone(&registry));

        assert_eq!(dispatcher.handle("PLAY").await.text, "Objet '' introuvable.");

        registry.create_photo("", "empty.jpg", 1.0, 2.0).await;
        let expected = registry.describe("").await.unwrap();
        assert_eq!(dispatcher.handle("SEARCH").await.text, expected);
        assert_eq!(dispatcher.handle("PLAY").await.text, "Opening photo: empty.jpg");
    }

    #[tokio::test]
    async fn test_quit() {
        let dispatcher = dispatcher().await;

        let response = dispatcher.handle("QUIT").await;
        assert_eq!(response.text, "Closing server...");
        assert!(!response.keep_open);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let dispatcher = dispatcher().await;

        let response = dispatcher.handle("FOO bar").await;
        assert_eq!(response.text, "Unknown command: FOO");
        assert!(response.keep_open);

        let response = dispatcher.handle("").await;
        assert_eq!(response.text, "Unknown command: ");
    }

    #[tokio::test]
    async fn test_response_never_contains_line_breaks() {
        let registry = Arc::new(MediaRegistry::headless());
        registry
            .create_photo("multi", "line\r\nfile.jpg", 0.0, 0.0)
            .await;
        let dispatcher = CommandDispatcher::new(registry);

        for line in ["SEARCH multi", "PLAY multi", "BAD\rverb", "QUIT"] {
            let response = dispatcher.handle(line).await;
            assert!(!response.text.contains('\n'), "{:?}", response.text);
            assert!(!response.text.contains('\r'), "{:?}", response.text);
        }
    }

    #[tokio::test]
    async fn test_dispatcher_sees_registry_updates() {
        let dispatcher = dispatcher().await;

        dispatcher.registry().remove_entity("Photo1").await;
        let response = dispatcher.handle("SEARCH Photo1").await;
        assert_eq!(response.text, "Objet 'Photo1' introuvable.");
    }
}
