//! # Arena Core
//!
//! Combat-resolution core for a real-time multiplayer arena shooter.
//!
//! This crate contains **only** combat logic:
//! - No rendering
//! - No IO
//! - No networking
//! - No wall-clock reads inside the tick (the clock is injected)
//!
//! This separation enables:
//! - An authoritative headless server build
//! - Deterministic replay of recorded matches
//! - Time-controlled testing without sleeping
//!
//! ## Crate Structure
//!
//! - [`attributes`] - Point-budget attribute curves
//! - [`arsenal`] - Bullet effects, ordinance kinds, weapon assembly
//! - [`status`] - Time-bounded status effects on players
//! - [`field`] - Spatial area effects (explosions, zones, mines)
//! - [`arena`] - The authoritative combat tick
//! - [`math`] - 2D vector utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod arena;
pub mod arsenal;
pub mod attributes;
pub mod error;
pub mod field;
pub mod math;
pub mod player;
pub mod status;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::{
        Clock, CombatArena, CombatCommand, DamageEvent, FieldEffectParams, HealEvent, SystemClock,
        TickEvents,
    };
    pub use crate::arsenal::{
        ArsenalCatalog, BulletEffect, Ordinance, Weapon, WeaponConfig, WeaponStats, POINT_BUDGET,
    };
    pub use crate::attributes::{compute, AttributeKind, Curve};
    pub use crate::error::{CombatError, Result};
    pub use crate::field::{FieldEffect, FieldEffectKind, Target};
    pub use crate::math::Vec2;
    pub use crate::player::{EntityId, EntityWorld, Player, Team};
    pub use crate::status::{StatusEffect, StatusEngine};
}
