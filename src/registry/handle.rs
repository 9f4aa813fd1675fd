//! Handles for registry-owned records
//!
//! A handle pairs the name an entity was created under with the id of that
//! particular creation. Re-creating under the same name issues a new id, so
//! handles to the replaced record stop resolving.

use std::fmt;

/// Unique id of one created entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// Raw id value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Unique id of one created group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) u64);

impl GroupId {
    /// Raw id value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Non-owning reference to a media entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub(crate) id: EntityId,
    pub(crate) name: String,
}

impl EntityHandle {
    pub(crate) fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creation id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Name the entity was registered under
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl AsRef<EntityHandle> for EntityHandle {
    fn as_ref(&self) -> &EntityHandle {
        self
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id.0)
    }
}

/// Handle to an entity known to be a film
///
/// Only films carry chapter marks, so chapter updates take this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilmHandle(pub(crate) EntityHandle);

impl FilmHandle {
    /// The underlying entity handle
    pub fn entity(&self) -> &EntityHandle {
        &self.0
    }

    /// Name the film was registered under
    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl AsRef<EntityHandle> for FilmHandle {
    fn as_ref(&self) -> &EntityHandle {
        &self.0
    }
}

impl From<FilmHandle> for EntityHandle {
    fn from(handle: FilmHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for FilmHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Reference to a group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupHandle {
    pub(crate) id: GroupId,
    pub(crate) name: String,
}

impl GroupHandle {
    pub(crate) fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creation id
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for GroupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id.0)
    }
}
