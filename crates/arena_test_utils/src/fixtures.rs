//! Weapon configuration fixtures.
//!
//! Pre-built point allocations for consistent testing. All fixtures
//! spend exactly the full budget with no bullet effects or special
//! ordinance, so effect and ordinance costs can be layered on top by
//! individual tests.

use arena_core::arsenal::WeaponConfig;

/// An all-round rifle: 30 damage, 30-round magazine, decent range.
#[must_use]
pub fn balanced_rifle_config() -> WeaponConfig {
    WeaponConfig {
        name: "balanced rifle".to_string(),
        damage: 20,
        fire_rate: 25,
        range: 10,
        accuracy: 0,
        magazine_size: 25,
        reload_time: 10,
        projectile_speed: 10,
        bullets_per_shot: 0,
        linear_damping: 0,
        bullet_effects: Vec::new(),
        ordinance: "bullet".to_string(),
    }
}

/// Maximum offense paid for with terrible accuracy.
#[must_use]
pub fn glass_cannon_config() -> WeaponConfig {
    WeaponConfig {
        name: "glass cannon".to_string(),
        damage: 40,
        fire_rate: 30,
        range: 10,
        accuracy: -10,
        magazine_size: 0,
        reload_time: 10,
        projectile_speed: 0,
        bullets_per_shot: 20,
        linear_damping: 0,
        bullet_effects: Vec::new(),
        ordinance: "bullet".to_string(),
    }
}

/// Sustained-fire build: big magazine, fast reload, modest damage.
#[must_use]
pub fn tank_config() -> WeaponConfig {
    WeaponConfig {
        name: "tank".to_string(),
        damage: 25,
        fire_rate: 0,
        range: 20,
        accuracy: 0,
        magazine_size: 30,
        reload_time: 25,
        projectile_speed: 0,
        bullets_per_shot: 0,
        linear_damping: 0,
        bullet_effects: Vec::new(),
        ordinance: "bullet".to_string(),
    }
}
