//! Player continuous state and the entity-world collaborator interface.
//!
//! The combat core mutates player health, speed and damping; it never owns
//! or mutates physics bodies. Positions and team identity for arbitrary
//! entities come from the [`EntityWorld`] collaborator supplied each tick.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Unique identifier for entities (players, props, projectiles).
pub type EntityId = u64;

/// Team identifier. Team `0` means free-for-all (no team).
pub type Team = u8;

/// Mutable continuous state for one player.
///
/// Status effects drive `health`, `max_speed` and `linear_damping`
/// directly each tick; the player object itself is never replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique entity id.
    pub id: EntityId,
    /// Team (0 = free-for-all).
    pub team: Team,
    /// Current health points.
    pub health: f32,
    /// Maximum health points.
    pub max_health: f32,
    /// Maximum movement speed, consumed by the physics layer.
    pub max_speed: f32,
    /// Linear damping applied by the physics layer.
    pub linear_damping: f32,
}

impl Player {
    /// Default maximum health for a freshly spawned player.
    pub const DEFAULT_MAX_HEALTH: f32 = 100.0;
    /// Default maximum speed before modifiers.
    pub const DEFAULT_MAX_SPEED: f32 = 120.0;
    /// Default linear damping before modifiers.
    pub const DEFAULT_LINEAR_DAMPING: f32 = 0.03;

    /// Create a new player at full health with default movement state.
    #[must_use]
    pub fn new(id: EntityId, team: Team) -> Self {
        Self {
            id,
            team,
            health: Self::DEFAULT_MAX_HEALTH,
            max_health: Self::DEFAULT_MAX_HEALTH,
            max_speed: Self::DEFAULT_MAX_SPEED,
            linear_damping: Self::DEFAULT_LINEAR_DAMPING,
        }
    }

    /// Check if the player is dead (health == 0).
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply raw damage to health, flooring at zero.
    ///
    /// Returns the damage actually absorbed. Status-effect damage
    /// interception happens before this is called.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.health).max(0.0);
        self.health -= actual;
        actual
    }

    /// Heal the player, clamping to maximum health.
    ///
    /// Returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let headroom = (self.max_health - self.health).max(0.0);
        let actual = amount.min(headroom).max(0.0);
        self.health += actual;
        actual
    }
}

/// Read-only view of the physics/positioning collaborator.
///
/// The combat core queries entity positions and team identity through
/// this trait; the session layer implements it over the live physics
/// world, tests implement it over canned data.
pub trait EntityWorld {
    /// World position of an entity, if it exists.
    fn position(&self, id: EntityId) -> Option<Vec2>;

    /// Team of an entity, if it exists. `0` means free-for-all.
    fn team(&self, id: EntityId) -> Option<Team>;

    /// Whether the entity is a player (as opposed to a prop or projectile).
    fn is_player(&self, id: EntityId) -> bool;

    /// All live entity ids, in ascending order for deterministic iteration.
    fn entity_ids(&self) -> Vec<EntityId>;
}
