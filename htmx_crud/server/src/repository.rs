use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A record that can be kept in an [`InMemoryRepository`].
pub trait Entity: Clone {
    /// Returns the identifier assigned by the repository.
    fn id(&self) -> u64;
}

struct Entries<T> {
    by_id: BTreeMap<u64, T>,
    last_id: u64,
}

/// Thread-safe, in-memory store for one entity type.
///
/// Identifiers are allocated under the write lock and never reused, so they are
/// strictly increasing and iterating the map by key yields insertion order.
/// Every method is atomic on its own; there is no cross-call transaction and
/// concurrent updates to the same id are last-writer-wins.
pub struct InMemoryRepository<T> {
    entries: RwLock<Entries<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                by_id: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    /// Returns a snapshot of all entities in insertion order.
    pub fn find_all(&self) -> Vec<T> {
        self.entries.read().by_id.values().cloned().collect()
    }

    /// Allocates the next id, builds the entity with it and stores it.
    ///
    /// # Arguments
    ///
    /// * `build` - Constructs the entity from the freshly allocated id.
    ///
    /// # Returns
    ///
    /// A copy of the stored entity.
    pub fn add<F>(&self, build: F) -> T
    where
        F: FnOnce(u64) -> T,
    {
        let mut entries = self.entries.write();
        entries.last_id += 1;
        let entity = build(entries.last_id);
        debug_assert_eq!(entity.id(), entries.last_id);
        entries.by_id.insert(entity.id(), entity.clone());
        entity
    }

    pub fn find_by_id(&self, id: u64) -> Option<T> {
        self.entries.read().by_id.get(&id).cloned()
    }

    /// Replaces the stored entity that has the same id.
    ///
    /// Returns `None` without storing anything when the id is unknown.
    pub fn update(&self, entity: T) -> Option<T> {
        let mut entries = self.entries.write();
        let slot = entries.by_id.get_mut(&entity.id())?;
        *slot = entity.clone();
        Some(entity)
    }

    /// Applies `change` to the stored entity while holding the write lock.
    pub fn modify<F>(&self, id: u64, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut entries = self.entries.write();
        let entity = entries.by_id.get_mut(&id)?;
        change(entity);
        Some(entity.clone())
    }

    /// Removes the entity with the given id, returning whether anything was removed.
    pub fn delete(&self, id: u64) -> bool {
        self.entries.write().by_id.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}
