//! Spatial, time-bounded area effects.
//!
//! Explosions, hazard/support zones and proximity mines share one
//! representation: a center, a radius, a lifetime, and team-aware
//! targeting. One-shot kinds track which entities they already hit;
//! duration kinds rate-limit damage per target; mines carry an arming
//! deadline before they can trigger.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::player::{EntityId, Team};

/// The kinds of field effect the arena produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldEffectKind {
    /// One-shot blast with distance falloff.
    Explosion,
    /// One-shot burst of fragments, uniform damage within radius.
    FragBurst,
    /// Lingering zone that damages enemies on an interval.
    FireZone,
    /// Lingering zone that heals the owner (or the owner's team).
    HealZone,
    /// Lingering zone that speeds up the owner (or the owner's team).
    SpeedZone,
    /// Deployed charge that arms after a delay, then detonates on proximity.
    ProximityMine,
}

impl FieldEffectKind {
    /// One-shot kinds affect each entity at most once.
    #[must_use]
    pub const fn is_instantaneous(self) -> bool {
        matches!(self, Self::Explosion | Self::FragBurst)
    }

    /// Supportive kinds help rather than harm and use ally targeting.
    #[must_use]
    pub const fn is_supportive(self) -> bool {
        matches!(self, Self::HealZone | Self::SpeedZone)
    }

    /// Minimum milliseconds between applications to the same target
    /// (0 = no rate limiting; one-shot kinds use the affected set instead).
    #[must_use]
    pub const fn damage_interval_ms(self) -> u64 {
        match self {
            Self::Explosion | Self::FragBurst | Self::ProximityMine => 0,
            Self::FireZone => 500,
            Self::HealZone | Self::SpeedZone => 250,
        }
    }

    /// Arming delay after creation, for kinds that need one.
    #[must_use]
    pub const fn arming_delay_ms(self) -> Option<u64> {
        match self {
            Self::ProximityMine => Some(2_000),
            _ => None,
        }
    }
}

/// A candidate target for a field effect, assembled from the entity world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Entity id.
    pub id: EntityId,
    /// Entity team (0 = free-for-all).
    pub team: Team,
    /// World position.
    pub position: Vec2,
}

/// A spatial, time-bounded area entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEffect {
    id: u64,
    owner: EntityId,
    owner_team: Team,
    kind: FieldEffectKind,
    center: Vec2,
    radius: f32,
    base_damage: f32,
    created_at: u64,
    expires_at: u64,
    armed_at: Option<u64>,
    active: bool,
    affected: HashSet<EntityId>,
    last_damage: HashMap<EntityId, u64>,
}

impl FieldEffect {
    /// Create a new field effect.
    ///
    /// `expires_at = created_at + duration_ms`; mines additionally get an
    /// arming deadline from their kind's arming delay.
    #[must_use]
    pub fn new(
        id: u64,
        owner: EntityId,
        owner_team: Team,
        kind: FieldEffectKind,
        center: Vec2,
        radius: f32,
        base_damage: f32,
        created_at: u64,
        duration_ms: u64,
    ) -> Self {
        Self {
            id,
            owner,
            owner_team,
            kind,
            center,
            radius,
            base_damage,
            created_at,
            expires_at: created_at + duration_ms,
            armed_at: kind.arming_delay_ms().map(|delay| created_at + delay),
            active: true,
            affected: HashSet::new(),
            last_damage: HashMap::new(),
        }
    }

    /// Effect id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Owning entity.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Owning team (0 = free-for-all).
    #[must_use]
    pub const fn owner_team(&self) -> Team {
        self.owner_team
    }

    /// Effect kind.
    #[must_use]
    pub const fn kind(&self) -> FieldEffectKind {
        self.kind
    }

    /// Center position.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Effect radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Base damage (or heal amount for supportive kinds) per application.
    #[must_use]
    pub const fn base_damage(&self) -> f32 {
        self.base_damage
    }

    /// Creation timestamp in milliseconds.
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Expiry timestamp in milliseconds.
    #[must_use]
    pub const fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// Check whether this effect is done: deactivated or past expiry.
    #[must_use]
    pub const fn is_expired(&self, now_ms: u64) -> bool {
        !self.active || now_ms > self.expires_at
    }

    /// Check the arming state. Kinds without an arming delay are always
    /// armed; a mine arms strictly after its deadline.
    #[must_use]
    pub fn is_armed(&self, now_ms: u64) -> bool {
        self.armed_at.map_or(true, |deadline| now_ms > deadline)
    }

    /// Team-aware targeting check, evaluated in policy order.
    ///
    /// An unarmed mine affects nothing. Supportive effects target the
    /// owner in free-for-all and the whole owning team in team mode;
    /// damaging effects never target the owner and respect teams.
    #[must_use]
    pub fn can_affect(&self, target: &Target, now_ms: u64) -> bool {
        if self.is_expired(now_ms) {
            return false;
        }
        if target.position.distance_squared(self.center) > self.radius * self.radius {
            return false;
        }
        if !self.is_armed(now_ms) {
            return false;
        }
        if self.kind.is_instantaneous() && self.affected.contains(&target.id) {
            return false;
        }

        if self.kind.is_supportive() {
            if self.owner_team == 0 || target.team == 0 {
                target.id == self.owner
            } else {
                target.team == self.owner_team
            }
        } else {
            if target.id == self.owner {
                return false;
            }
            if self.owner_team == 0 {
                true
            } else {
                target.team != self.owner_team
            }
        }
    }

    /// Intensity in `[0, 1]` at a position.
    ///
    /// Explosions fall off linearly from full intensity at the center to
    /// 0.2 at the rim; every other kind is uniform within the radius.
    #[must_use]
    pub fn intensity_at(&self, position: Vec2) -> f32 {
        let distance_sq = position.distance_squared(self.center);
        if distance_sq > self.radius * self.radius {
            return 0.0;
        }
        match self.kind {
            FieldEffectKind::Explosion => {
                if self.radius <= 0.0 {
                    return 1.0;
                }
                let distance = distance_sq.sqrt();
                (0.2 + 0.8 * (1.0 - distance / self.radius)).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Damage (or heal amount) at a position: `base_damage * intensity`.
    #[must_use]
    pub fn damage_at(&self, position: Vec2) -> f32 {
        self.base_damage * self.intensity_at(position)
    }

    /// Check the per-target rate limit for duration kinds.
    ///
    /// One-shot kinds are gated by the affected set instead and always
    /// return `true` here.
    #[must_use]
    pub fn ready_to_damage(&self, target: EntityId, now_ms: u64) -> bool {
        let interval = self.kind.damage_interval_ms();
        if interval == 0 {
            return true;
        }
        match self.last_damage.get(&target) {
            Some(last) => now_ms.saturating_sub(*last) >= interval,
            None => true,
        }
    }

    /// Record an application against a target: one-shot kinds remember the
    /// target forever, duration kinds stamp the rate-limit map.
    pub fn mark_applied(&mut self, target: EntityId, now_ms: u64) {
        if self.kind.is_instantaneous() {
            self.affected.insert(target);
        } else {
            self.last_damage.insert(target, now_ms);
        }
    }

    /// Deactivate the effect before its natural expiry (mine detonation,
    /// manual removal). Synchronous; the next sweep removes it.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
