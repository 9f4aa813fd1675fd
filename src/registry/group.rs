//! Named group of entity references
//!
//! A group never owns its members. It keeps handles in insertion order and
//! leaves resolution to the registry at describe time, so entity removals
//! show up lazily.

use super::handle::{EntityHandle, GroupId};

/// Ordered, append-only list of entity handles with a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    name: String,
    members: Vec<EntityHandle>,
}

impl Group {
    pub(crate) fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
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

    /// Append a member; duplicates are kept
    pub(crate) fn add_member(&mut self, member: EntityHandle) {
        self.members.push(member);
    }

    /// Members in insertion order
    pub fn members(&self) -> &[EntityHandle] {
        &self.members
    }

    /// Number of members, including ones that no longer resolve
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Render the header followed by one line per resolvable member
    ///
    /// `resolve` maps a handle to its description; members it cannot
    /// resolve are skipped.
    pub fn describe<F>(&self, mut resolve: F) -> String
    where
        F: FnMut(&EntityHandle) -> Option<String>,
    {
        let mut out = format!("Groupe : {}", self.name);
        for member in &self.members {
            if let Some(line) = resolve(member) {
                out.push('\n');
                out.push_str(&line);
            }
        }
        out
    }
}
