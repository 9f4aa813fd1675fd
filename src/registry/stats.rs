//! Registry statistics

/// Point-in-time counters for a registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered entities
    pub entity_count: usize,
    /// Number of registered groups
    pub group_count: usize,
    /// Total group memberships, duplicates included
    pub member_count: usize,
    /// Memberships whose entity was removed or replaced
    pub dangling_members: usize,
}
