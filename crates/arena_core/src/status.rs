//! Time-bounded status effects on players.
//!
//! A status effect is a capability bundle, not a subclass: identity for
//! stacking, an absolute expiry, a render hint for the client, and up to
//! four optional hooks stored as plain closures. Dispatch is data-driven,
//! and simultaneous effects compose as pure transforms folded in
//! insertion order, so any mix of buffs and debuffs combines
//! deterministically.
//!
//! At most one effect per `unique_key` is active on a player; applying a
//! second instance displaces the first. A displaced or expired effect has
//! its revert hook invoked exactly once before removal, for any removal
//! reason.

pub mod library;

use std::fmt;

use crate::arsenal::{Weapon, WeaponStats};
use crate::player::Player;

/// Hook run every tick to drive continuous player state (regen, poison,
/// speed changes). Receives the elapsed milliseconds since the last tick.
pub type PlayerTickHook = Box<dyn Fn(&mut Player, u64) + Send>;

/// Pure transform over a weapon stats view. Never mutates the base weapon.
pub type WeaponViewHook = Box<dyn Fn(WeaponStats) -> WeaponStats + Send>;

/// Pure transform over incoming damage before it reaches health.
pub type IncomingDamageHook = Box<dyn Fn(f32) -> f32 + Send>;

/// Hook run once when the effect is removed, undoing any direct state
/// changes the tick hook made.
pub type RevertHook = Box<dyn Fn(&mut Player) + Send>;

/// A time-bounded modification attached to one player.
pub struct StatusEffect {
    unique_key: String,
    expires_at_ms: u64,
    render_hint: String,
    on_player_tick: Option<PlayerTickHook>,
    on_weapon_view: Option<WeaponViewHook>,
    on_incoming_damage: Option<IncomingDamageHook>,
    on_revert: Option<RevertHook>,
}

impl StatusEffect {
    /// Sentinel expiry meaning "never expires".
    pub const NEVER_EXPIRES: u64 = 0;

    /// Create an effect with the given stacking key and absolute expiry
    /// timestamp in milliseconds (0 = never expires). Hooks are attached
    /// with the builder methods.
    #[must_use]
    pub fn new(unique_key: impl Into<String>, expires_at_ms: u64) -> Self {
        Self {
            unique_key: unique_key.into(),
            expires_at_ms,
            render_hint: String::new(),
            on_player_tick: None,
            on_weapon_view: None,
            on_incoming_damage: None,
            on_revert: None,
        }
    }

    /// Builder method to set the render hint
    /// (`effectName:#RRGGBB:animationType:showIcon:DisplayName`).
    #[must_use]
    pub fn with_render_hint(mut self, hint: impl Into<String>) -> Self {
        self.render_hint = hint.into();
        self
    }

    /// Builder method to attach a per-tick player hook.
    #[must_use]
    pub fn with_player_tick(mut self, hook: impl Fn(&mut Player, u64) + Send + 'static) -> Self {
        self.on_player_tick = Some(Box::new(hook));
        self
    }

    /// Builder method to attach a weapon stats transform.
    #[must_use]
    pub fn with_weapon_view(
        mut self,
        hook: impl Fn(WeaponStats) -> WeaponStats + Send + 'static,
    ) -> Self {
        self.on_weapon_view = Some(Box::new(hook));
        self
    }

    /// Builder method to attach an incoming-damage transform.
    #[must_use]
    pub fn with_incoming_damage(mut self, hook: impl Fn(f32) -> f32 + Send + 'static) -> Self {
        self.on_incoming_damage = Some(Box::new(hook));
        self
    }

    /// Builder method to attach a revert hook.
    #[must_use]
    pub fn with_revert(mut self, hook: impl Fn(&mut Player) + Send + 'static) -> Self {
        self.on_revert = Some(Box::new(hook));
        self
    }

    /// Stacking/replacement identity.
    #[must_use]
    pub fn unique_key(&self) -> &str {
        &self.unique_key
    }

    /// Absolute expiry timestamp in milliseconds (0 = never).
    #[must_use]
    pub const fn expires_at_ms(&self) -> u64 {
        self.expires_at_ms
    }

    /// Client visualization hint, emitted unchanged.
    #[must_use]
    pub fn render_hint(&self) -> &str {
        &self.render_hint
    }

    /// Check expiry against an absolute timestamp.
    ///
    /// The sentinel expiry `0` never expires, regardless of elapsed time.
    #[must_use]
    pub const fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms != Self::NEVER_EXPIRES && now_ms > self.expires_at_ms
    }

    fn run_player_tick(&self, player: &mut Player, delta_ms: u64) {
        if let Some(hook) = &self.on_player_tick {
            hook(player, delta_ms);
        }
    }

    fn view_weapon(&self, stats: WeaponStats) -> WeaponStats {
        match &self.on_weapon_view {
            Some(hook) => hook(stats),
            None => stats,
        }
    }

    fn intercept_damage(&self, damage: f32) -> f32 {
        match &self.on_incoming_damage {
            Some(hook) => hook(damage),
            None => damage,
        }
    }

    fn revert(&self, player: &mut Player) {
        if let Some(hook) = &self.on_revert {
            hook(player);
        }
    }
}

impl fmt::Debug for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusEffect")
            .field("unique_key", &self.unique_key)
            .field("expires_at_ms", &self.expires_at_ms)
            .field("render_hint", &self.render_hint)
            .field("on_player_tick", &self.on_player_tick.is_some())
            .field("on_weapon_view", &self.on_weapon_view.is_some())
            .field("on_incoming_damage", &self.on_incoming_damage.is_some())
            .field("on_revert", &self.on_revert.is_some())
            .finish()
    }
}

/// Per-player collection of active status effects.
///
/// Insertion order defines the composition order for weapon views and
/// damage interception, so effect stacking is deterministic.
#[derive(Debug, Default)]
pub struct StatusEngine {
    effects: Vec<StatusEffect>,
}

impl StatusEngine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect to the player.
    ///
    /// An active effect with the same `unique_key` is reverted and
    /// removed first, then the new effect is appended.
    pub fn apply(&mut self, player: &mut Player, effect: StatusEffect) {
        if let Some(index) = self
            .effects
            .iter()
            .position(|e| e.unique_key == effect.unique_key)
        {
            let displaced = self.effects.remove(index);
            displaced.revert(player);
        }
        self.effects.push(effect);
    }

    /// Remove an effect by key, reverting it. Returns `true` if present.
    pub fn remove(&mut self, player: &mut Player, unique_key: &str) -> bool {
        if let Some(index) = self.effects.iter().position(|e| e.unique_key == unique_key) {
            let removed = self.effects.remove(index);
            removed.revert(player);
            true
        } else {
            false
        }
    }

    /// Run every active effect's per-tick hook in insertion order.
    pub fn tick(&self, player: &mut Player, delta_ms: u64) {
        for effect in &self.effects {
            effect.run_player_tick(player, delta_ms);
        }
    }

    /// Fold all weapon-view transforms over the base weapon's stats,
    /// producing a read-only composed view. The stored weapon is never
    /// mutated.
    #[must_use]
    pub fn effective_weapon(&self, base: &Weapon) -> WeaponStats {
        self.effective_stats(*base.stats())
    }

    /// Fold weapon-view transforms over an explicit stats view.
    #[must_use]
    pub fn effective_stats(&self, base: WeaponStats) -> WeaponStats {
        self.effects
            .iter()
            .fold(base, |stats, effect| effect.view_weapon(stats))
    }

    /// Fold incoming-damage transforms over a raw damage value, in
    /// insertion order, and return the final damage to apply.
    #[must_use]
    pub fn apply_incoming_damage(&self, raw_damage: f32) -> f32 {
        self.effects
            .iter()
            .fold(raw_damage, |damage, effect| effect.intercept_damage(damage))
    }

    /// Remove every expired effect, reverting each exactly once.
    pub fn sweep_expired(&mut self, player: &mut Player, now_ms: u64) {
        self.effects.retain(|effect| {
            if effect.is_expired(now_ms) {
                effect.revert(player);
                false
            } else {
                true
            }
        });
    }

    /// Revert and remove every effect (used on death/respawn).
    pub fn clear(&mut self, player: &mut Player) {
        for effect in self.effects.drain(..) {
            effect.revert(player);
        }
    }

    /// Render hints for all active effects, in insertion order.
    #[must_use]
    pub fn render_hints(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.render_hint()).collect()
    }

    /// Check if an effect with the given key is active.
    #[must_use]
    pub fn contains(&self, unique_key: &str) -> bool {
        self.effects.iter().any(|e| e.unique_key == unique_key)
    }

    /// Number of active effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if no effects are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::arsenal::{ArsenalCatalog, Weapon, WeaponConfig};

    fn test_weapon() -> Weapon {
        let config = WeaponConfig {
            name: "test".to_string(),
            damage: 20,
            fire_rate: 0,
            range: 0,
            accuracy: 0,
            magazine_size: 0,
            reload_time: 0,
            projectile_speed: 0,
            bullets_per_shot: 0,
            linear_damping: 0,
            bullet_effects: Vec::new(),
            ordinance: "bullet".to_string(),
        };
        Weapon::assemble(&config, &ArsenalCatalog::with_defaults()).unwrap()
    }

    #[test]
    fn test_same_key_displaces_and_reverts_once() {
        let reverts = Arc::new(AtomicUsize::new(0));
        let mut player = Player::new(1, 0);
        let mut engine = StatusEngine::new();

        let counter = Arc::clone(&reverts);
        engine.apply(
            &mut player,
            StatusEffect::new("boost", 5_000)
                .with_revert(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        );
        engine.apply(&mut player, StatusEffect::new("boost", 9_000));

        assert_eq!(engine.len(), 1);
        assert_eq!(reverts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_expiry_never_expires() {
        let effect = StatusEffect::new("permanent", StatusEffect::NEVER_EXPIRES);
        assert!(!effect.is_expired(0));
        assert!(!effect.is_expired(u64::MAX));
    }

    #[test]
    fn test_expiry_is_strictly_after_deadline() {
        let effect = StatusEffect::new("timed", 1_000);
        assert!(!effect.is_expired(1_000));
        assert!(effect.is_expired(1_001));
    }

    #[test]
    fn test_sweep_reverts_exactly_once() {
        let reverts = Arc::new(AtomicUsize::new(0));
        let mut player = Player::new(1, 0);
        let mut engine = StatusEngine::new();

        let counter = Arc::clone(&reverts);
        engine.apply(
            &mut player,
            StatusEffect::new("timed", 1_000).with_revert(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        engine.sweep_expired(&mut player, 500);
        assert_eq!(engine.len(), 1);
        assert_eq!(reverts.load(Ordering::SeqCst), 0);

        engine.sweep_expired(&mut player, 1_001);
        assert!(engine.is_empty());
        assert_eq!(reverts.load(Ordering::SeqCst), 1);

        engine.sweep_expired(&mut player, 2_000);
        assert_eq!(reverts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_weapon_view_composes_in_insertion_order() {
        let mut player = Player::new(1, 0);
        let mut engine = StatusEngine::new();
        let weapon = test_weapon();

        engine.apply(
            &mut player,
            StatusEffect::new("double", 0).with_weapon_view(|mut s| {
                s.damage *= 2.0;
                s
            }),
        );
        engine.apply(
            &mut player,
            StatusEffect::new("plus_five", 0).with_weapon_view(|mut s| {
                s.damage += 5.0;
                s
            }),
        );

        // (30 * 2) + 5, not (30 + 5) * 2
        assert_eq!(engine.effective_weapon(&weapon).damage, 65.0);
        // Base weapon untouched
        assert_eq!(weapon.stats().damage, 30.0);
    }

    #[test]
    fn test_incoming_damage_fold() {
        let mut player = Player::new(1, 0);
        let mut engine = StatusEngine::new();

        let resistance = 50.0_f32;
        engine.apply(
            &mut player,
            StatusEffect::new("resist", 0).with_incoming_damage(move |d| d * resistance / 100.0),
        );
        assert_eq!(engine.apply_incoming_damage(50.0), 25.0);

        engine.apply(
            &mut player,
            StatusEffect::new("vulnerable", 0).with_incoming_damage(|d| d * 2.0),
        );
        assert_eq!(engine.apply_incoming_damage(50.0), 50.0);
    }

    #[test]
    fn test_tick_drives_player_state() {
        let mut player = Player::new(1, 0);
        player.health = 50.0;
        let mut engine = StatusEngine::new();

        engine.apply(
            &mut player,
            StatusEffect::new("regen", 0).with_player_tick(|p, delta_ms| {
                p.heal(10.0 * delta_ms as f32 / 1000.0);
            }),
        );

        engine.tick(&mut player, 500);
        assert_eq!(player.health, 55.0);
    }

    #[test]
    fn test_clear_reverts_everything() {
        let reverts = Arc::new(AtomicUsize::new(0));
        let mut player = Player::new(1, 0);
        let mut engine = StatusEngine::new();

        for key in ["a", "b", "c"] {
            let counter = Arc::clone(&reverts);
            engine.apply(
                &mut player,
                StatusEffect::new(key, 0).with_revert(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        engine.clear(&mut player);
        assert!(engine.is_empty());
        assert_eq!(reverts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_render_hints_pass_through_unchanged() {
        let mut player = Player::new(1, 0);
        let mut engine = StatusEngine::new();
        engine.apply(
            &mut player,
            StatusEffect::new("boost", 0)
                .with_render_hint("damageBoost:#FF3B1F:pulse:true:Damage Boost"),
        );

        assert_eq!(
            engine.render_hints(),
            vec!["damageBoost:#FF3B1F:pulse:true:Damage Boost"]
        );
    }
}
