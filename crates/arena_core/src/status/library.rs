//! Stock status effects.
//!
//! Constructors for the effects the arena ships with. Each bundles its
//! hooks and render hint behind a stable `unique_key`, so re-applying a
//! pickup refreshes the effect instead of stacking a duplicate.

use crate::player::Player;
use crate::status::StatusEffect;

/// Multiplies outgoing weapon damage.
#[must_use]
pub fn damage_boost(multiplier: f32, expires_at_ms: u64) -> StatusEffect {
    StatusEffect::new("damage_boost", expires_at_ms)
        .with_render_hint("damageBoost:#FF3B1F:pulse:true:Damage Boost")
        .with_weapon_view(move |mut stats| {
            stats.damage *= multiplier;
            stats
        })
}

/// Scales incoming damage by `resistance`/100 (e.g. 50 halves damage).
#[must_use]
pub fn damage_resistance(resistance: f32, expires_at_ms: u64) -> StatusEffect {
    StatusEffect::new("damage_resistance", expires_at_ms)
        .with_render_hint("damageResist:#3FA7FF:shield:true:Damage Resist")
        .with_incoming_damage(move |damage| damage * resistance / 100.0)
}

/// Double outgoing damage at the price of amplified incoming damage.
#[must_use]
pub fn berserker(expires_at_ms: u64) -> StatusEffect {
    StatusEffect::new("berserker", expires_at_ms)
        .with_render_hint("berserker:#B3121F:rage:true:Berserker")
        .with_weapon_view(|mut stats| {
            stats.damage *= 2.0;
            stats
        })
        .with_incoming_damage(|damage| damage * 1.5)
}

/// Restores health continuously.
#[must_use]
pub fn health_regen(hp_per_second: f32, expires_at_ms: u64) -> StatusEffect {
    StatusEffect::new("health_regen", expires_at_ms)
        .with_render_hint("healthRegen:#2ECC40:sparkle:true:Regeneration")
        .with_player_tick(move |player, delta_ms| {
            player.heal(hp_per_second * delta_ms as f32 / 1000.0);
        })
}

/// Drains health continuously.
#[must_use]
pub fn poison(damage_per_second: f32, expires_at_ms: u64) -> StatusEffect {
    StatusEffect::new("poison", expires_at_ms)
        .with_render_hint("poison:#7FDB2A:drip:true:Poisoned")
        .with_player_tick(move |player, delta_ms| {
            player.apply_damage(damage_per_second * delta_ms as f32 / 1000.0);
        })
}

/// Raises maximum speed while active; reverts to the default on removal.
#[must_use]
pub fn speed_boost(multiplier: f32, expires_at_ms: u64) -> StatusEffect {
    StatusEffect::new("speed_boost", expires_at_ms)
        .with_render_hint("speedBoost:#FFDC00:streak:true:Speed Boost")
        .with_player_tick(move |player, _| {
            player.max_speed = Player::DEFAULT_MAX_SPEED * multiplier;
        })
        .with_revert(|player| {
            player.max_speed = Player::DEFAULT_MAX_SPEED;
        })
}

/// Slows the player and raises damping while active.
#[must_use]
pub fn slow(multiplier: f32, expires_at_ms: u64) -> StatusEffect {
    StatusEffect::new("slow", expires_at_ms)
        .with_render_hint("slow:#9B59B6:drag:true:Slowed")
        .with_player_tick(move |player, _| {
            player.max_speed = Player::DEFAULT_MAX_SPEED * multiplier;
            player.linear_damping = Player::DEFAULT_LINEAR_DAMPING * 2.0;
        })
        .with_revert(|player| {
            player.max_speed = Player::DEFAULT_MAX_SPEED;
            player.linear_damping = Player::DEFAULT_LINEAR_DAMPING;
        })
}
