//! Media registry
//!
//! The registry owns every entity and group and indexes both by name.
//! Groups hold non-owning handles that are resolved against the registry
//! each time the group is described.
//!
//! # Architecture
//!
//! ```text
//!                      Arc<MediaRegistry>
//!                ┌──────────────────────────────┐
//!                │ RwLock<Catalog {             │
//!                │   names:  name  -> EntityId  │
//!                │   slots:  id    -> Entity    │
//!                │   groups: name  -> Group     │
//!                │ }>                           │
//!                └──────────────┬───────────────┘
//!                               │
//!          ┌────────────────────┼────────────────────┐
//!          ▼                    ▼                    ▼
//!     [Session 1]          [Session 2]          [Direct API]
//!     SEARCH / PLAY        SEARCH / PLAY        create / remove
//! ```
//!
//! # Staleness
//!
//! Removing or re-creating an entity never touches group membership lists.
//! A member whose id no longer has a slot is skipped when the group is
//! described.

pub mod group;
pub mod handle;
pub mod stats;
pub mod store;

pub use group::Group;
pub use handle::{EntityHandle, EntityId, FilmHandle, GroupHandle, GroupId};
pub use stats::RegistryStats;
pub use store::MediaRegistry;
