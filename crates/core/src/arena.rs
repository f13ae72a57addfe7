//! Stable-id storage for short-lived runtime entities.

use slotmap::{Key, SlotMap, new_key_type};

new_key_type! {
    pub struct BirdId;
    pub struct PlaneId;
}

/// Entities keyed by a stable id. Removal goes through [`EntityArena::retain`], so callers
/// never delete by position while iterating.
#[derive(Clone, Debug)]
pub struct EntityArena<K: Key, T> {
    slots: SlotMap<K, T>,
}

impl<K: Key, T> EntityArena<K, T> {
    pub fn new() -> Self {
        Self { slots: SlotMap::with_key() }
    }

    pub fn insert(&mut self, entity: T) -> K {
        self.slots.insert(entity)
    }

    pub fn get(&self, id: K) -> Option<&T> {
        self.slots.get(id)
    }

    pub fn contains(&self, id: K) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.slots.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.values_mut()
    }

    /// Keeps only entities for which `keep` holds; returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, entity| keep(entity));
        before - self.slots.len()
    }
}

impl<K: Key, T> Default for EntityArena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, T: PartialEq> PartialEq for EntityArena<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_drops_matching_entities_and_keeps_ids_stable() {
        let mut arena: EntityArena<PlaneId, i32> = EntityArena::new();
        let first = arena.insert(1);
        let second = arena.insert(2);
        let third = arena.insert(3);

        let dropped = arena.retain(|value| value % 2 == 1);

        assert_eq!(dropped, 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(first), Some(&1));
        assert!(!arena.contains(second));
        assert_eq!(arena.get(third), Some(&3));
    }

    #[test]
    fn removed_ids_are_not_resurrected_by_new_inserts() {
        let mut arena: EntityArena<BirdId, &str> = EntityArena::new();
        let gone = arena.insert("gone");
        arena.retain(|_| false);
        let fresh = arena.insert("fresh");

        assert_ne!(gone, fresh);
        assert_eq!(arena.get(gone), None);
        assert_eq!(arena.get(fresh), Some(&"fresh"));
    }

    #[test]
    fn arenas_with_same_history_compare_equal() {
        let mut left: EntityArena<PlaneId, u8> = EntityArena::new();
        let mut right: EntityArena<PlaneId, u8> = EntityArena::new();
        for value in [4, 5, 6] {
            left.insert(value);
            right.insert(value);
        }
        assert_eq!(left, right);

        right.retain(|&value| value != 5);
        assert_ne!(left, right);
    }
}
