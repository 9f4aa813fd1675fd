//! Media registry implementation
//!
//! The central store that owns every entity and group and indexes them by
//! name.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::media::{
    Film, Media, MediaEntity, NullPlayer, Photo, Player, Seconds, SystemPlayer, Video,
};

use super::group::Group;
use super::handle::{EntityHandle, EntityId, FilmHandle, GroupHandle, GroupId};
use super::stats::RegistryStats;

/// Lock-protected registry state
#[derive(Debug, Default)]
struct Catalog {
    next_entity_id: u64,
    next_group_id: u64,
    /// Current entity id for each name
    names: HashMap<String, EntityId>,
    /// Entity storage, addressed by id
    slots: HashMap<EntityId, MediaEntity>,
    groups: HashMap<String, Group>,
}

impl Catalog {
    fn insert_entity(&mut self, name: String, entity: MediaEntity) -> EntityHandle {
        if name.is_empty() {
            tracing::warn!(kind = %entity.kind(), "Entity registered under an empty name");
        }

        self.next_entity_id += 1;
        let id = EntityId(self.next_entity_id);

        if let Some(old) = self.names.insert(name.clone(), id) {
            self.slots.remove(&old);
            tracing::debug!(name = %name, old_id = old.0, new_id = id.0, "Entity replaced");
        }
        self.slots.insert(id, entity);

        EntityHandle::new(id, name)
    }

    fn lookup(&self, name: &str) -> Option<&MediaEntity> {
        self.names.get(name).and_then(|id| self.slots.get(id))
    }

    fn resolve(&self, handle: &EntityHandle) -> Option<&MediaEntity> {
        self.slots.get(&handle.id)
    }

    fn group(&self, handle: &GroupHandle) -> Option<&Group> {
        self.groups.get(&handle.name).filter(|g| g.id() == handle.id)
    }

    fn group_mut(&mut self, handle: &GroupHandle) -> Option<&mut Group> {
        self.groups
            .get_mut(&handle.name)
            .filter(|g| g.id() == handle.id)
    }
}

/// Central registry for media entities and groups
///
/// Thread-safe via a single `RwLock` around all maps. Composite reads such
/// as group descriptions run under one read guard; the player is always
/// invoked after the guard is released.
pub struct MediaRegistry {
    catalog: RwLock<Catalog>,
    player: Arc<dyn Player>,
}

impl MediaRegistry {
    /// Create a registry that opens files with the platform's default program
    pub fn new() -> Self {
        Self::with_player(Arc::new(SystemPlayer::default()))
    }

    /// Create a registry whose play requests never launch anything
    pub fn headless() -> Self {
        Self::with_player(Arc::new(NullPlayer))
    }

    /// Create a registry with a custom player
    pub fn with_player(player: Arc<dyn Player>) -> Self {
        Self {
            catalog: RwLock::new(Catalog::default()),
            player,
        }
    }

    /// Register a photo, replacing any entity with the same name
    pub async fn create_photo(
        &self,
        name: impl Into<String>,
        file: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> EntityHandle {
        let name = name.into();
        let photo = Photo::new(name.clone(), file.into(), latitude, longitude);

        let handle = self
            .catalog
            .write()
            .await
            .insert_entity(name, MediaEntity::Photo(photo));

        tracing::debug!(entity = %handle, "Photo created");
        handle
    }

    /// Register a video, replacing any entity with the same name
    ///
    /// Fractional durations are truncated to whole seconds.
    pub async fn create_video(
        &self,
        name: impl Into<String>,
        file: impl Into<String>,
        duration: impl Into<Seconds>,
    ) -> EntityHandle {
        let name = name.into();
        let video = Video::new(name.clone(), file.into(), duration.into());

        let handle = self
            .catalog
            .write()
            .await
            .insert_entity(name, MediaEntity::Video(video));

        tracing::debug!(entity = %handle, "Video created");
        handle
    }

    /// Register a film without chapters, replacing any entity with the same name
    pub async fn create_film(
        &self,
        name: impl Into<String>,
        file: impl Into<String>,
        duration: impl Into<Seconds>,
    ) -> FilmHandle {
        let name = name.into();
        let film = Film::new(name.clone(), file.into(), duration.into());

        let handle = self
            .catalog
            .write()
            .await
            .insert_entity(name, MediaEntity::Film(film));

        tracing::debug!(entity = %handle, "Film created");
        FilmHandle(handle)
    }

    /// Replace the chapter marks of a film
    ///
    /// Fails with `EntityNotFound` if the film was removed or replaced.
    pub async fn set_chapters(
        &self,
        film: &FilmHandle,
        marks: impl Into<Vec<u32>>,
    ) -> Result<()> {
        let mut catalog = self.catalog.write().await;

        let entry = catalog
            .slots
            .get_mut(&film.0.id)
            .and_then(MediaEntity::as_film_mut)
            .ok_or_else(|| Error::EntityNotFound(film.name().to_string()))?;

        entry.set_chapters(marks.into());
        tracing::debug!(entity = %film, chapters = entry.chapters().len(), "Chapters updated");
        Ok(())
    }

    /// Register an empty group, replacing any group with the same name
    pub async fn create_group(&self, name: impl Into<String>) -> GroupHandle {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!("Group registered under an empty name");
        }

        let mut catalog = self.catalog.write().await;

        catalog.next_group_id += 1;
        let id = GroupId(catalog.next_group_id);

        if catalog
            .groups
            .insert(name.clone(), Group::new(id, name.clone()))
            .is_some()
        {
            tracing::debug!(group = %name, "Group replaced");
        }

        let handle = GroupHandle::new(id, name);
        tracing::debug!(group = %handle, "Group created");
        handle
    }

    /// Append an entity reference to a group
    ///
    /// The member is not checked against the entity map; resolution happens
    /// when the group is described.
    pub async fn add_member(
        &self,
        group: &GroupHandle,
        member: impl AsRef<EntityHandle>,
    ) -> Result<()> {
        let member = member.as_ref();
        let mut catalog = self.catalog.write().await;

        let entry = catalog
            .group_mut(group)
            .ok_or_else(|| Error::GroupNotFound(group.name().to_string()))?;
        entry.add_member(member.clone());

        tracing::debug!(group = %group, member = %member, size = entry.len(), "Member added");
        Ok(())
    }

    /// Snapshot of the entity registered under `name`
    pub async fn lookup_entity(&self, name: &str) -> Result<MediaEntity> {
        self.catalog
            .read()
            .await
            .lookup(name)
            .cloned()
            .ok_or_else(|| Error::EntityNotFound(name.to_string()))
    }

    /// Snapshot of the group registered under `name`
    pub async fn lookup_group(&self, name: &str) -> Result<Group> {
        self.catalog
            .read()
            .await
            .groups
            .get(name)
            .cloned()
            .ok_or_else(|| Error::GroupNotFound(name.to_string()))
    }

    /// Snapshot of the entity a handle points to, if it still exists
    pub async fn resolve(&self, handle: &EntityHandle) -> Option<MediaEntity> {
        self.catalog.read().await.resolve(handle).cloned()
    }

    /// Snapshot of the group a handle points to, if it still exists
    pub async fn resolve_group(&self, handle: &GroupHandle) -> Option<Group> {
        self.catalog.read().await.group(handle).cloned()
    }

    /// Check whether an entity is registered under `name`
    pub async fn contains_entity(&self, name: &str) -> bool {
        self.catalog.read().await.names.contains_key(name)
    }

    /// Check whether a group is registered under `name`
    pub async fn contains_group(&self, name: &str) -> bool {
        self.catalog.read().await.groups.contains_key(name)
    }

    /// Describe the entity registered under `name`
    pub async fn describe(&self, name: &str) -> Result<String> {
        self.catalog
            .read()
            .await
            .lookup(name)
            .map(|e| e.describe())
            .ok_or_else(|| Error::EntityNotFound(name.to_string()))
    }

    /// Describe a group and every member that still resolves
    ///
    /// Members whose entity was removed or replaced are skipped.
    pub async fn describe_group(&self, name: &str) -> Result<String> {
        let catalog = self.catalog.read().await;

        let group = catalog
            .groups
            .get(name)
            .ok_or_else(|| Error::GroupNotFound(name.to_string()))?;

        let mut skipped = 0usize;
        let text = group.describe(|member| match catalog.resolve(member) {
            Some(entity) => Some(entity.describe()),
            None => {
                skipped += 1;
                None
            }
        });

        if skipped > 0 {
            tracing::debug!(group = %name, skipped = skipped, "Skipped dangling members");
        }

        Ok(text)
    }

    /// Play the entity registered under `name`
    ///
    /// Returns the confirmation text. The player runs after the lock is
    /// released and its outcome is not reported.
    pub async fn play(&self, name: &str) -> Result<String> {
        let entity = self.lookup_entity(name).await?;

        tracing::debug!(name = %name, kind = %entity.kind(), file = %entity.file(), "Playing");
        Ok(entity.play(self.player.as_ref()))
    }

    /// Remove an entity
    ///
    /// Group memberships are left in place and stop resolving.
    pub async fn remove_entity(&self, name: &str) -> bool {
        let mut catalog = self.catalog.write().await;

        match catalog.names.remove(name) {
            Some(id) => {
                catalog.slots.remove(&id);
                tracing::debug!(name = %name, id = id.0, "Entity removed");
                true
            }
            None => false,
        }
    }

    /// Alias of [`remove_entity`](Self::remove_entity)
    pub async fn remove_object(&self, name: &str) -> bool {
        self.remove_entity(name).await
    }

    /// Remove a group; its members are unaffected
    pub async fn remove_group(&self, name: &str) -> bool {
        let removed = self.catalog.write().await.groups.remove(name);

        match removed {
            Some(group) => {
                tracing::debug!(group = %name, members = group.len(), "Group removed");
                true
            }
            None => false,
        }
    }

    /// Registered entity names, sorted
    pub async fn entity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalog.read().await.names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered group names, sorted
    pub async fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalog.read().await.groups.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get registry statistics
    pub async fn stats(&self) -> RegistryStats {
        let catalog = self.catalog.read().await;

        let mut stats = RegistryStats {
            entity_count: catalog.names.len(),
            group_count: catalog.groups.len(),
            ..Default::default()
        };

        for group in catalog.groups.values() {
            stats.member_count += group.len();
            stats.dangling_members += group
                .members()
                .iter()
                .filter(|m| catalog.resolve(m).is_none())
                .count();
        }

        stats
    }
}

impl Default for MediaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MediaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, Weak};

    use super::*;

    #[derive(Default)]
    struct RecordingPlayer {
        opened: Mutex<Vec<String>>,
    }

    impl Player for RecordingPlayer {
        fn open(&self, file: &str) {
            self.opened.lock().unwrap().push(file.to_string());
        }
    }

    #[tokio::test]
    async fn test_distinct_names_coexist() {
        let registry = MediaRegistry::headless();

        registry.create_photo("a", "a.jpg", 1.0, 2.0).await;
        registry.create_video("b", "b.mp4", 10u32).await;

        assert!(registry.describe("a").await.unwrap().contains("a.jpg"));
        assert!(registry.describe("b").await.unwrap().contains("b.mp4"));
        assert_eq!(registry.entity_names().await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_create_overwrites_same_name() {
        let registry = MediaRegistry::headless();

        let old = registry.create_photo("x", "old.jpg", 0.0, 0.0).await;
        let new = registry.create_video("x", "new.mp4", 5u32).await;

        assert_ne!(old.id(), new.id());
        let text = registry.describe("x").await.unwrap();
        assert!(text.contains("new.mp4"));
        assert!(!text.contains("old.jpg"));

        // Old handle no longer resolves
        assert!(registry.resolve(&old).await.is_none());
        assert!(registry.resolve(&new).await.is_some());
        assert_eq!(registry.stats().await.entity_count, 1);
    }

    #[tokio::test]
    async fn test_describe_video_duration() {
        let registry = MediaRegistry::headless();
        registry.create_video("v", "f.mp4", 120u32).await;

        let text = registry.describe("v").await.unwrap();
        assert!(text.contains("Duree: 120s"));
    }

    #[tokio::test]
    async fn test_video_duration_truncated() {
        let registry = MediaRegistry::headless();
        registry.create_video("v", "f.mp4", 59.99_f64).await;

        let video = registry.lookup_entity("v").await.unwrap();
        assert_eq!(video.as_video().unwrap().duration(), Seconds(59));
    }

    #[tokio::test]
    async fn test_film_chapters() {
        let registry = MediaRegistry::headless();

        let film = registry.create_film("f", "f.mkv", 90u32).await;
        assert!(registry
            .describe("f")
            .await
            .unwrap()
            .contains("Chapitres : Aucun"));

        registry.set_chapters(&film, vec![30, 60]).await.unwrap();
        assert!(registry
            .describe("f")
            .await
            .unwrap()
            .contains("Chapitres : 30s, 60s"));

        // Stored as given, unsorted and with duplicates
        registry.set_chapters(&film, vec![60, 30, 30]).await.unwrap();
        assert!(registry
            .describe("f")
            .await
            .unwrap()
            .ends_with("Chapitres : 60s, 30s, 30s"));

        registry.set_chapters(&film, Vec::new()).await.unwrap();
        assert!(registry
            .describe("f")
            .await
            .unwrap()
            .contains("Chapitres : Aucun"));
    }

    #[tokio::test]
    async fn test_set_chapters_on_replaced_film() {
        let registry = MediaRegistry::headless();

        let film = registry.create_film("f", "f.mkv", 90u32).await;
        registry.create_photo("f", "f.jpg", 0.0, 0.0).await;

        let result = registry.set_chapters(&film, vec![1]).await;
        assert!(matches!(result, Err(Error::EntityNotFound(ref n)) if n == "f"));
    }

    #[tokio::test]
    async fn test_remove_entity_once() {
        let registry = MediaRegistry::headless();
        registry.create_photo("p", "p.jpg", 0.0, 0.0).await;

        assert!(registry.remove_entity("p").await);
        assert!(!registry.remove_entity("p").await);
        assert!(!registry.remove_object("p").await);

        let result = registry.describe("p").await;
        assert!(matches!(result, Err(Error::EntityNotFound(_))));
        assert!(!registry.contains_entity("p").await);
    }

    #[tokio::test]
    async fn test_describe_group_in_insertion_order() {
        let registry = MediaRegistry::headless();

        let e1 = registry.create_photo("e1", "one.jpg", 0.0, 0.0).await;
        let e2 = registry.create_video("e2", "two.mp4", 3u32).await;
        let group = registry.create_group("g").await;

        registry.add_member(&group, &e1).await.unwrap();
        registry.add_member(&group, &e2).await.unwrap();

        let text = registry.describe_group("g").await.unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Groupe : g");
        assert!(lines[1].contains("one.jpg"));
        assert!(lines[2].contains("two.mp4"));
    }

    #[tokio::test]
    async fn test_group_skips_removed_members() {
        let registry = MediaRegistry::headless();

        let e1 = registry.create_photo("e1", "one.jpg", 0.0, 0.0).await;
        let e2 = registry.create_video("e2", "two.mp4", 3u32).await;
        let film = registry.create_film("e3", "three.mkv", 4u32).await;
        let group = registry.create_group("g").await;

        registry.add_member(&group, &e1).await.unwrap();
        registry.add_member(&group, &e2).await.unwrap();
        registry.add_member(&group, &film).await.unwrap();

        registry.remove_entity("e2").await;

        let text = registry.describe_group("g").await.unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(!text.contains("two.mp4"));
        assert!(text.contains("three.mkv"));

        // Membership list itself is untouched
        let snapshot = registry.lookup_group("g").await.unwrap();
        assert_eq!(snapshot.len(), 3);

        let stats = registry.stats().await;
        assert_eq!(stats.member_count, 3);
        assert_eq!(stats.dangling_members, 1);
    }

    #[tokio::test]
    async fn test_group_member_replaced_by_recreate() {
        let registry = MediaRegistry::headless();

        let e1 = registry.create_photo("e1", "one.jpg", 0.0, 0.0).await;
        let group = registry.create_group("g").await;
        registry.add_member(&group, &e1).await.unwrap();

        registry.create_photo("e1", "other.jpg", 0.0, 0.0).await;

        let text = registry.describe_group("g").await.unwrap();
        assert_eq!(text, "Groupe : g");
    }

    #[tokio::test]
    async fn test_stale_group_handle() {
        let registry = MediaRegistry::headless();

        let e1 = registry.create_photo("e1", "one.jpg", 0.0, 0.0).await;
        let old = registry.create_group("g").await;
        let new = registry.create_group("g").await;

        let result = registry.add_member(&old, &e1).await;
        assert!(matches!(result, Err(Error::GroupNotFound(_))));
        assert!(registry.resolve_group(&old).await.is_none());

        registry.add_member(&new, &e1).await.unwrap();
        assert_eq!(registry.lookup_group("g").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_group_keeps_entities() {
        let registry = MediaRegistry::headless();

        let e1 = registry.create_photo("e1", "one.jpg", 0.0, 0.0).await;
        let group = registry.create_group("g").await;
        registry.add_member(&group, &e1).await.unwrap();

        assert!(registry.remove_group("g").await);
        assert!(!registry.remove_group("g").await);

        assert!(registry.contains_entity("e1").await);
        assert!(matches!(
            registry.describe_group("g").await,
            Err(Error::GroupNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_group_and_entity_namespaces_are_independent() {
        let registry = MediaRegistry::headless();

        registry.create_photo("same", "p.jpg", 0.0, 0.0).await;
        registry.create_group("same").await;

        assert!(registry.remove_group("same").await);
        assert!(registry.contains_entity("same").await);
        assert_eq!(registry.group_names().await, Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_play_uses_player() {
        let player = Arc::new(RecordingPlayer::default());
        let registry = MediaRegistry::with_player(player.clone());

        registry.create_video("v", "clip.mp4", 120u32).await;

        let msg = registry.play("v").await.unwrap();
        assert_eq!(msg, "Playing video: clip.mp4 (Duration: 120s)");
        assert_eq!(*player.opened.lock().unwrap(), vec!["clip.mp4"]);

        let result = registry.play("missing").await;
        assert!(matches!(result, Err(Error::EntityNotFound(_))));
        assert_eq!(player.opened.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_is_an_ordinary_key() {
        let registry = MediaRegistry::headless();
        assert!(registry.describe("").await.unwrap_err().is_not_found());

        registry.create_video("", "blank.mp4", 3u32).await;
        assert_eq!(
            registry.describe("").await.unwrap(),
            "Nom :  | Fichier : blank.mp4 | Duree: 3s"
        );
        assert!(registry.remove_entity("").await);
        assert!(!registry.contains_entity("").await);
    }

    /// Records whether the catalog lock was free while a file was opened
    struct LockCheckingPlayer {
        registry: Weak<MediaRegistry>,
        lock_free: Arc<Mutex<Vec<bool>>>,
    }

    impl Player for LockCheckingPlayer {
        fn open(&self, _file: &str) {
            let free = self
                .registry
                .upgrade()
                .map(|registry| registry.catalog.try_write().is_ok())
                .unwrap_or(false);
            self.lock_free.lock().unwrap().push(free);
        }
    }

    #[tokio::test]
    async fn test_play_runs_player_outside_lock() {
        let lock_free = Arc::new(Mutex::new(Vec::new()));
        let registry = Arc::new_cyclic(|weak: &Weak<MediaRegistry>| {
            MediaRegistry::with_player(Arc::new(LockCheckingPlayer {
                registry: weak.clone(),
                lock_free: Arc::clone(&lock_free),
            }))
        });

        registry.create_photo("p", "pic.jpg", 1.0, 2.0).await;
        registry.create_video("v", "clip.mp4", 120u32).await;
        let film = registry.create_film("f", "film.mkv", 90u32).await;
        registry.set_chapters(&film, vec![30]).await.unwrap();

        for name in ["p", "v", "f"] {
            registry.play(name).await.unwrap();
        }

        assert_eq!(*lock_free.lock().unwrap(), vec![true, true, true]);
    }

    #[tokio::test]
    async fn test_concurrent_creates() {
        let registry = Arc::new(MediaRegistry::headless());
        let group = registry.create_group("all").await;

        let mut tasks = Vec::new();
        for i in 0..32 {
            let registry = Arc::clone(&registry);
            let group = group.clone();
            tasks.push(tokio::spawn(async move {
                let handle = registry
                    .create_video(format!("v{}", i), format!("{}.mp4", i), i as u32)
                    .await;
                registry.add_member(&group, &handle).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let stats = registry.stats().await;
        assert_eq!(stats.entity_count, 32);
        assert_eq!(stats.member_count, 32);
        assert_eq!(stats.dangling_members, 0);
        assert_eq!(registry.describe_group("all").await.unwrap().lines().count(), 33);
    }
}
