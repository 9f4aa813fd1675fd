//! # mediatheque
//!
//! In-memory registry of named media (photos, videos, films) and named
//! groups of media, served over a persistent-connection, line-based TCP
//! protocol.
//!
//! ## Direct API
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mediatheque::MediaRegistry;
//!
//! # async fn example() -> mediatheque::Result<()> {
//! let registry = Arc::new(MediaRegistry::new());
//!
//! let photo = registry.create_photo("Photo1", "montsouris.jpg", 48.8, 2.3).await;
//! let film = registry.create_film("Film1", "film.mkv", 5400u32).await;
//! registry.set_chapters(&film, vec![600, 1800]).await?;
//!
//! let group = registry.create_group("Mes Medias").await;
//! registry.add_member(&group, &photo).await?;
//! registry.add_member(&group, &film).await?;
//!
//! println!("{}", registry.describe_group("Mes Medias").await?);
//! println!("{}", registry.play("Film1").await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Protocol server
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mediatheque::{MediaRegistry, MediaServer, ServerConfig};
//!
//! # async fn example() -> mediatheque::Result<()> {
//! let registry = Arc::new(MediaRegistry::new());
//! registry.create_video("Video1", "video.mp4", 120u32).await;
//!
//! let server = MediaServer::new(ServerConfig::default(), registry);
//! server.run().await
//! # }
//! ```
//!
//! Requests are `SEARCH <name>`, `PLAY <name>` and `QUIT`, one per line;
//! every response is exactly one line.

pub mod error;
pub mod media;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;

pub use error::{Error, Result};
pub use media::{Film, Media, MediaEntity, MediaKind, Photo, Player, Seconds, Video};
pub use protocol::{Command, CommandDispatcher, Response};
pub use registry::{EntityHandle, FilmHandle, Group, GroupHandle, MediaRegistry, RegistryStats};
pub use server::{MediaServer, ServerConfig};
