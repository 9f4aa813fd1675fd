//! Media entities and the play capability
//!
//! This module provides:
//! - The closed set of media variants (Photo, Video, Film)
//! - The `Media` capability trait shared by every variant
//! - The `Player` seam used to open files on the host

pub mod entity;
pub mod player;

pub use entity::{Film, Media, MediaEntity, MediaKind, Photo, Seconds, Video};
pub use player::{NullPlayer, Player, SystemPlayer};
