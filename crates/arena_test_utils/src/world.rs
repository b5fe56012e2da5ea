//! Canned entity worlds.

use std::collections::BTreeMap;

use arena_core::math::Vec2;
use arena_core::player::{EntityId, EntityWorld, Team};

#[derive(Debug, Clone, Copy)]
struct Entry {
    team: Team,
    position: Vec2,
    is_player: bool,
}

/// An [`EntityWorld`] backed by a fixed table of entities.
///
/// Entities iterate in id order, so scenarios involving multiple
/// targets resolve the same way on every run.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    entries: BTreeMap<EntityId, Entry>,
}

impl StaticWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player entity.
    #[must_use]
    pub fn with_player(mut self, id: EntityId, team: Team, position: Vec2) -> Self {
        self.entries.insert(
            id,
            Entry {
                team,
                position,
                is_player: true,
            },
        );
        self
    }

    /// Add a destructible non-player entity (crate, turret, ...).
    #[must_use]
    pub fn with_prop(mut self, id: EntityId, team: Team, position: Vec2) -> Self {
        self.entries.insert(
            id,
            Entry {
                team,
                position,
                is_player: false,
            },
        );
        self
    }

    /// Move an entity.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.position = position;
        }
    }

    /// Remove an entity.
    pub fn remove(&mut self, id: EntityId) {
        self.entries.remove(&id);
    }
}

impl EntityWorld for StaticWorld {
    fn position(&self, id: EntityId) -> Option<Vec2> {
        self.entries.get(&id).map(|e| e.position)
    }

    fn team(&self, id: EntityId) -> Option<Team> {
        self.entries.get(&id).map(|e| e.team)
    }

    fn is_player(&self, id: EntityId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.is_player)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.entries.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_iterate_in_id_order() {
        let world = StaticWorld::new()
            .with_player(3, 0, Vec2::ZERO)
            .with_player(1, 0, Vec2::ZERO)
            .with_prop(2, 0, Vec2::ZERO);

        assert_eq!(world.entity_ids(), vec![1, 2, 3]);
        assert!(world.is_player(1));
        assert!(!world.is_player(2));
        assert!(world.position(4).is_none());
    }
}
