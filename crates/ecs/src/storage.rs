use campuswalk_common::Entity;
use std::collections::BTreeMap;

/// Per-component-type storage contract.
///
/// `keys` returns a stable snapshot per call; no ordering is promised
/// across calls, only within one.
pub trait Storage<T> {
    /// Insert or overwrite the component for an entity.
    fn write(&mut self, id: Entity, value: T);
    /// Read the component if present.
    fn read(&self, id: Entity) -> Option<&T>;
    /// Mutable access to the component if present.
    fn get_mut(&mut self, id: Entity) -> Option<&mut T>;
    /// Delete the component if present. Absence is not an error.
    fn remove(&mut self, id: Entity);
    /// Whether the entity has this component.
    fn contains(&self, id: Entity) -> bool;
    /// Snapshot of all entity ids present.
    fn keys(&self) -> Vec<Entity>;
}

/// Sparse storage backed by a BTreeMap for deterministic iteration order.
#[derive(Debug, Default)]
pub struct SparseStorage<T> {
    data: BTreeMap<Entity, T>,
}

impl<T> SparseStorage<T> {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Storage<T> for SparseStorage<T> {
    fn write(&mut self, id: Entity, value: T) {
        self.data.insert(id, value);
    }

    fn read(&self, id: Entity) -> Option<&T> {
        self.data.get(&id)
    }

    fn get_mut(&mut self, id: Entity) -> Option<&mut T> {
        self.data.get_mut(&id)
    }

    fn remove(&mut self, id: Entity) {
        self.data.remove(&id);
    }

    fn contains(&self, id: Entity) -> bool {
        self.data.contains_key(&id)
    }

    fn keys(&self) -> Vec<Entity> {
        self.data.keys().copied().collect()
    }
}
