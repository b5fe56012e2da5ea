//! The authoritative combat tick.
//!
//! A single simulation thread owns all per-player status collections and
//! per-effect bookkeeping. Request-handling paths (player input, timers,
//! event triggers) never mutate that state directly: they enqueue
//! [`CombatCommand`]s, and the tick drains the queue before doing any
//! other work.
//!
//! All expiration and arming timing is driven by an injected [`Clock`],
//! so effect durations are independent of frame rate and tests can
//! advance time without sleeping.
//!
//! # Tick Order
//!
//! 1. **Commands** - drain the queued cross-thread requests
//! 2. **Status** - per player: sweep expired effects, run tick hooks
//! 3. **Field effects** - targeting, arming, damage and support
//! 4. **Cleanup** - drop expired and deactivated field effects
//!
//! A panicking status or targeting hook is isolated: the offending
//! player or effect is skipped for that tick and everything else
//! proceeds (the simulation loop must stay available for all entities).

use std::collections::{BTreeMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::arsenal::{ArsenalCatalog, Weapon, WeaponConfig, WeaponStats};
use crate::error::{CombatError, Result};
use crate::field::{FieldEffect, FieldEffectKind, Target};
use crate::math::Vec2;
use crate::player::{EntityId, EntityWorld, Player, Team};
use crate::status::{library, StatusEffect, StatusEngine};

/// Lifetime of the blast a detonating mine leaves behind.
const MINE_BLAST_DURATION_MS: u64 = 400;

/// How long a speed-zone buff lingers after leaving the zone.
const ZONE_BUFF_DURATION_MS: u64 = 1_000;

/// Speed multiplier granted by a speed zone.
const ZONE_SPEED_MULTIPLIER: f32 = 1.4;

/// Source of absolute timestamps in milliseconds.
///
/// The arena never reads the wall clock directly; production injects
/// [`SystemClock`], tests inject a manually advanced clock.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Wall-clock time source for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Parameters for spawning a field effect.
///
/// Creation and expiry timestamps are stamped by the arena's clock when
/// the spawn is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEffectParams {
    /// Entity that created the effect.
    pub owner: EntityId,
    /// Team of the creator (0 = free-for-all).
    pub owner_team: Team,
    /// Effect kind.
    pub kind: FieldEffectKind,
    /// Center position.
    pub center: Vec2,
    /// Effect radius.
    pub radius: f32,
    /// Base damage (or heal amount) per application.
    pub base_damage: f32,
    /// Lifetime in milliseconds.
    pub duration_ms: u64,
}

/// A request from outside the tick thread.
///
/// The per-player status collections and per-effect bookkeeping maps are
/// tick-owned; these commands are the only way other threads reach them.
#[derive(Debug)]
pub enum CombatCommand {
    /// Replace a player's weapon from a configuration payload.
    /// Rejected configurations keep the previous weapon.
    ConfigureWeapon {
        /// Target player.
        player: EntityId,
        /// The configuration payload.
        config: WeaponConfig,
    },
    /// Apply a status effect to a player.
    ApplyStatus {
        /// Target player.
        player: EntityId,
        /// The effect to apply.
        effect: StatusEffect,
    },
    /// Remove a status effect by key, reverting it.
    RemoveStatus {
        /// Target player.
        player: EntityId,
        /// Stacking key of the effect to remove.
        unique_key: String,
    },
    /// Spawn a field effect.
    SpawnFieldEffect(FieldEffectParams),
    /// Manually detonate a deployed effect (e.g. remote mine trigger).
    Detonate {
        /// Id of the effect to detonate.
        effect: u64,
    },
    /// Deactivate a field effect without detonating it.
    RemoveFieldEffect {
        /// Id of the effect to remove.
        effect: u64,
    },
}

/// Damage applied to a target during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// Field effect that caused the damage.
    pub effect: u64,
    /// Entity that was hit.
    pub target: EntityId,
    /// Damage actually applied, after status interception.
    pub amount: f32,
}

/// Healing applied to a player during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealEvent {
    /// Field effect that caused the heal.
    pub effect: u64,
    /// Player that was healed.
    pub target: EntityId,
    /// Health actually restored.
    pub amount: f32,
}

/// Events generated during one combat tick, consumed by the session
/// layer for scoring, sounds and visual feedback.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Damage applications.
    pub damage: Vec<DamageEvent>,
    /// Heal applications.
    pub heals: Vec<HealEvent>,
    /// Players whose health reached zero this tick.
    pub deaths: Vec<EntityId>,
    /// Mines that detonated this tick.
    pub detonations: Vec<u64>,
    /// Field effects removed this tick (expired or deactivated).
    pub expired_effects: Vec<u64>,
    /// Players whose queued weapon configuration was rejected.
    pub rejected_configs: Vec<EntityId>,
}

/// Per-player combat state owned by the arena.
#[derive(Debug)]
struct PlayerSlot {
    player: Player,
    weapon: Option<Weapon>,
    status: StatusEngine,
}

/// The combat-resolution core.
///
/// Owns player combat state, weapons, status effects and field effects,
/// and advances them deterministically each tick. Entity positions and
/// team identity come from the [`EntityWorld`] collaborator; the arena
/// never owns physics bodies.
#[derive(Debug)]
pub struct CombatArena<C: Clock> {
    clock: C,
    catalog: ArsenalCatalog,
    players: BTreeMap<EntityId, PlayerSlot>,
    field_effects: Vec<FieldEffect>,
    next_effect_id: u64,
    commands: VecDeque<CombatCommand>,
    last_tick_ms: u64,
}

impl<C: Clock> CombatArena<C> {
    /// Create a new arena with the given clock and catalog.
    #[must_use]
    pub fn new(clock: C, catalog: ArsenalCatalog) -> Self {
        let last_tick_ms = clock.now_ms();
        Self {
            clock,
            catalog,
            players: BTreeMap::new(),
            field_effects: Vec::new(),
            next_effect_id: 1,
            commands: VecDeque::new(),
            last_tick_ms,
        }
    }

    /// Register a player at full health with no weapon.
    pub fn add_player(&mut self, id: EntityId, team: Team) {
        self.players.insert(
            id,
            PlayerSlot {
                player: Player::new(id, team),
                weapon: None,
                status: StatusEngine::new(),
            },
        );
    }

    /// Remove a player and all their combat state.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PlayerNotFound`] if the player is unknown.
    pub fn remove_player(&mut self, id: EntityId) -> Result<()> {
        self.players
            .remove(&id)
            .map(|_| ())
            .ok_or(CombatError::PlayerNotFound(id))
    }

    /// Get a player's continuous state.
    #[must_use]
    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.players.get(&id).map(|slot| &slot.player)
    }

    /// Get mutable access to a player's continuous state.
    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.players.get_mut(&id).map(|slot| &mut slot.player)
    }

    /// Get a player's assembled weapon, if any.
    #[must_use]
    pub fn weapon(&self, id: EntityId) -> Option<&Weapon> {
        self.players.get(&id).and_then(|slot| slot.weapon.as_ref())
    }

    /// Get mutable access to a player's weapon (fire/reload).
    pub fn weapon_mut(&mut self, id: EntityId) -> Option<&mut Weapon> {
        self.players
            .get_mut(&id)
            .and_then(|slot| slot.weapon.as_mut())
    }

    /// Assemble and install a weapon for a player.
    ///
    /// On failure the player's previous weapon (if any) is retained.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PlayerNotFound`] for an unknown player, or
    /// the assembly error for an invalid configuration.
    pub fn configure_weapon(&mut self, id: EntityId, config: &WeaponConfig) -> Result<()> {
        if !self.players.contains_key(&id) {
            return Err(CombatError::PlayerNotFound(id));
        }
        let weapon = Weapon::assemble(config, &self.catalog)?;
        if let Some(slot) = self.players.get_mut(&id) {
            slot.weapon = Some(weapon);
        }
        Ok(())
    }

    /// Apply a status effect to a player, displacing any active effect
    /// with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PlayerNotFound`] for an unknown player.
    pub fn apply_status(&mut self, id: EntityId, effect: StatusEffect) -> Result<()> {
        let slot = self
            .players
            .get_mut(&id)
            .ok_or(CombatError::PlayerNotFound(id))?;
        slot.status.apply(&mut slot.player, effect);
        Ok(())
    }

    /// Remove a status effect by key, reverting it.
    ///
    /// Returns `false` if no such effect was active.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PlayerNotFound`] for an unknown player.
    pub fn remove_status(&mut self, id: EntityId, unique_key: &str) -> Result<bool> {
        let slot = self
            .players
            .get_mut(&id)
            .ok_or(CombatError::PlayerNotFound(id))?;
        Ok(slot.status.remove(&mut slot.player, unique_key))
    }

    /// A player's weapon stats with all active weapon-view transforms
    /// folded in. The stored weapon is never mutated.
    #[must_use]
    pub fn effective_weapon(&self, id: EntityId) -> Option<WeaponStats> {
        let slot = self.players.get(&id)?;
        let weapon = slot.weapon.as_ref()?;
        Some(slot.status.effective_weapon(weapon))
    }

    /// Route damage to a player through status interception, then apply
    /// it to health. Returns the damage actually applied.
    ///
    /// This is the single incoming-damage path: direct hits reported by
    /// the physics layer and field-effect damage both go through it.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PlayerNotFound`] for an unknown player.
    pub fn apply_incoming_damage(&mut self, id: EntityId, raw_damage: f32) -> Result<f32> {
        let slot = self
            .players
            .get_mut(&id)
            .ok_or(CombatError::PlayerNotFound(id))?;
        let final_damage = slot.status.apply_incoming_damage(raw_damage);
        Ok(slot.player.apply_damage(final_damage))
    }

    /// Render hints for a player's active status effects, in order.
    #[must_use]
    pub fn render_hints(&self, id: EntityId) -> Vec<String> {
        self.players.get(&id).map_or_else(Vec::new, |slot| {
            slot.status
                .render_hints()
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    /// Enqueue a command from a request-handling path.
    ///
    /// The command runs at the start of the next tick.
    pub fn queue(&mut self, command: CombatCommand) {
        self.commands.push_back(command);
    }

    /// Spawn a field effect immediately (tick-thread callers only).
    ///
    /// Returns the new effect's id.
    pub fn spawn_field_effect(&mut self, params: FieldEffectParams) -> u64 {
        let now = self.clock.now_ms();
        self.insert_field_effect(&params, now)
    }

    /// Detonate a deployed effect, replacing it with a short-lived blast.
    ///
    /// Returns the blast's effect id.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::FieldEffectNotFound`] for an unknown effect.
    pub fn detonate(&mut self, effect_id: u64) -> Result<u64> {
        let now = self.clock.now_ms();
        self.detonate_at(effect_id, now)
    }

    /// Deactivate a field effect before its natural expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::FieldEffectNotFound`] for an unknown effect.
    pub fn remove_field_effect(&mut self, effect_id: u64) -> Result<()> {
        let fx = self
            .field_effects
            .iter_mut()
            .find(|fx| fx.id() == effect_id)
            .ok_or(CombatError::FieldEffectNotFound(effect_id))?;
        fx.deactivate();
        Ok(())
    }

    /// Get a field effect by id.
    #[must_use]
    pub fn field_effect(&self, effect_id: u64) -> Option<&FieldEffect> {
        self.field_effects.iter().find(|fx| fx.id() == effect_id)
    }

    /// All live field effects.
    #[must_use]
    pub fn field_effects(&self) -> &[FieldEffect] {
        &self.field_effects
    }

    /// Advance the combat simulation by one tick.
    pub fn tick<W: EntityWorld + ?Sized>(&mut self, world: &W) -> TickEvents {
        let now = self.clock.now_ms();
        let delta_ms = now.saturating_sub(self.last_tick_ms);
        self.last_tick_ms = now;

        let mut events = TickEvents::default();

        self.drain_commands(now, &mut events);
        self.run_status_ticks(now, delta_ms, &mut events);
        self.run_field_effects(world, now, &mut events);
        self.remove_expired_effects(now, &mut events);

        tracing::debug!(
            now_ms = now,
            players = self.players.len(),
            effects = self.field_effects.len(),
            "combat tick complete"
        );

        events
    }

    /// Execute all queued cross-thread commands.
    fn drain_commands(&mut self, now: u64, events: &mut TickEvents) {
        while let Some(command) = self.commands.pop_front() {
            match command {
                CombatCommand::ConfigureWeapon { player, config } => {
                    if let Err(error) = self.configure_weapon(player, &config) {
                        tracing::warn!(player, %error, "weapon configuration rejected");
                        events.rejected_configs.push(player);
                    }
                }
                CombatCommand::ApplyStatus { player, effect } => {
                    if let Err(error) = self.apply_status(player, effect) {
                        tracing::warn!(player, %error, "status application dropped");
                    }
                }
                CombatCommand::RemoveStatus { player, unique_key } => {
                    if let Err(error) = self.remove_status(player, &unique_key) {
                        tracing::warn!(player, %error, "status removal dropped");
                    }
                }
                CombatCommand::SpawnFieldEffect(params) => {
                    self.insert_field_effect(&params, now);
                }
                CombatCommand::Detonate { effect } => match self.detonate_at(effect, now) {
                    Ok(_) => events.detonations.push(effect),
                    Err(error) => {
                        tracing::warn!(effect, %error, "detonation dropped");
                    }
                },
                CombatCommand::RemoveFieldEffect { effect } => {
                    if let Err(error) = self.remove_field_effect(effect) {
                        tracing::warn!(effect, %error, "field effect removal dropped");
                    }
                }
            }
        }
    }

    /// Sweep expired status effects and run per-tick hooks per player.
    fn run_status_ticks(&mut self, now: u64, delta_ms: u64, events: &mut TickEvents) {
        for (id, slot) in &mut self.players {
            let was_alive = !slot.player.is_dead();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                slot.status.sweep_expired(&mut slot.player, now);
                slot.status.tick(&mut slot.player, delta_ms);
            }));
            if outcome.is_err() {
                tracing::error!(player = id, "status hook panicked, skipping player this tick");
                continue;
            }
            if was_alive && slot.player.is_dead() {
                events.deaths.push(*id);
            }
        }
    }

    /// Evaluate every live field effect against the entity world.
    fn run_field_effects<W: EntityWorld + ?Sized>(
        &mut self,
        world: &W,
        now: u64,
        events: &mut TickEvents,
    ) {
        let entity_ids = world.entity_ids();
        let mut blasts: Vec<FieldEffectParams> = Vec::new();

        let players = &mut self.players;
        for fx in &mut self.field_effects {
            if fx.is_expired(now) {
                continue;
            }
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                Self::evaluate_effect(fx, world, &entity_ids, players, now, events)
            }));
            match outcome {
                Ok(Some(blast)) => {
                    events.detonations.push(fx.id());
                    blasts.push(blast);
                }
                Ok(None) => {}
                Err(_) => {
                    tracing::error!(
                        effect = fx.id(),
                        "field effect evaluation panicked, skipping this tick"
                    );
                }
            }
        }

        for blast in blasts {
            self.insert_field_effect(&blast, now);
        }
    }

    /// Evaluate one field effect. Returns blast parameters when a
    /// proximity mine triggered.
    fn evaluate_effect<W: EntityWorld + ?Sized>(
        fx: &mut FieldEffect,
        world: &W,
        entity_ids: &[EntityId],
        players: &mut BTreeMap<EntityId, PlayerSlot>,
        now: u64,
        events: &mut TickEvents,
    ) -> Option<FieldEffectParams> {
        for &id in entity_ids {
            let Some(position) = world.position(id) else {
                continue;
            };
            let Some(team) = world.team(id) else {
                continue;
            };
            let target = Target { id, team, position };
            if !fx.can_affect(&target, now) {
                continue;
            }

            // An armed mine with an eligible target in range trades
            // itself for a blast; targets take damage from the blast on
            // following ticks, not from the mine entity.
            if fx.kind() == FieldEffectKind::ProximityMine {
                fx.deactivate();
                return Some(FieldEffectParams {
                    owner: fx.owner(),
                    owner_team: fx.owner_team(),
                    kind: FieldEffectKind::Explosion,
                    center: fx.center(),
                    radius: fx.radius(),
                    base_damage: fx.base_damage(),
                    duration_ms: MINE_BLAST_DURATION_MS,
                });
            }

            if !fx.ready_to_damage(id, now) {
                continue;
            }

            if fx.kind().is_supportive() {
                let Some(slot) = players.get_mut(&id) else {
                    continue;
                };
                if slot.player.is_dead() {
                    continue;
                }
                match fx.kind() {
                    FieldEffectKind::HealZone => {
                        let healed = slot.player.heal(fx.damage_at(position));
                        if healed > 0.0 {
                            events.heals.push(HealEvent {
                                effect: fx.id(),
                                target: id,
                                amount: healed,
                            });
                        }
                    }
                    FieldEffectKind::SpeedZone => {
                        slot.status.apply(
                            &mut slot.player,
                            library::speed_boost(
                                ZONE_SPEED_MULTIPLIER,
                                now + ZONE_BUFF_DURATION_MS,
                            ),
                        );
                    }
                    _ => {}
                }
                fx.mark_applied(id, now);
            } else {
                let raw = fx.damage_at(position);
                if let Some(slot) = players.get_mut(&id) {
                    if slot.player.is_dead() {
                        continue;
                    }
                    let final_damage = slot.status.apply_incoming_damage(raw);
                    let applied = slot.player.apply_damage(final_damage);
                    events.damage.push(DamageEvent {
                        effect: fx.id(),
                        target: id,
                        amount: applied,
                    });
                    if slot.player.is_dead() {
                        events.deaths.push(id);
                    }
                } else {
                    // Non-player entity: the physics layer owns its
                    // health, we just report the hit.
                    events.damage.push(DamageEvent {
                        effect: fx.id(),
                        target: id,
                        amount: raw,
                    });
                }
                fx.mark_applied(id, now);
            }
        }
        None
    }

    /// Drop expired and deactivated field effects.
    fn remove_expired_effects(&mut self, now: u64, events: &mut TickEvents) {
        self.field_effects.retain(|fx| {
            if fx.is_expired(now) {
                events.expired_effects.push(fx.id());
                false
            } else {
                true
            }
        });
    }

    fn insert_field_effect(&mut self, params: &FieldEffectParams, now: u64) -> u64 {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        self.field_effects.push(FieldEffect::new(
            id,
            params.owner,
            params.owner_team,
            params.kind,
            params.center,
            params.radius,
            params.base_damage,
            now,
            params.duration_ms,
        ));
        id
    }

    fn detonate_at(&mut self, effect_id: u64, now: u64) -> Result<u64> {
        let fx = self
            .field_effects
            .iter_mut()
            .find(|fx| fx.id() == effect_id)
            .ok_or(CombatError::FieldEffectNotFound(effect_id))?;
        fx.deactivate();
        let blast = FieldEffectParams {
            owner: fx.owner(),
            owner_team: fx.owner_team(),
            kind: FieldEffectKind::Explosion,
            center: fx.center(),
            radius: fx.radius(),
            base_damage: fx.base_damage(),
            duration_ms: MINE_BLAST_DURATION_MS,
        };
        Ok(self.insert_field_effect(&blast, now))
    }

    /// Capture a renderable snapshot of combat state for the session
    /// layer.
    #[must_use]
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            now_ms: self.last_tick_ms,
            players: self
                .players
                .values()
                .map(|slot| PlayerSnapshot {
                    id: slot.player.id,
                    team: slot.player.team,
                    health: slot.player.health,
                    max_health: slot.player.max_health,
                    ammo: slot.weapon.as_ref().map(Weapon::ammo),
                    render_hints: slot
                        .status
                        .render_hints()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                })
                .collect(),
            field_effects: self
                .field_effects
                .iter()
                .map(|fx| FieldEffectSnapshot {
                    id: fx.id(),
                    kind: fx.kind(),
                    center: fx.center(),
                    radius: fx.radius(),
                    expires_at: fx.expires_at(),
                })
                .collect(),
        }
    }
}

/// Renderable view of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Entity id.
    pub id: EntityId,
    /// Team (0 = free-for-all).
    pub team: Team,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Ammo in the current weapon, if one is equipped.
    pub ammo: Option<u32>,
    /// Render hints of active status effects, emitted unchanged.
    pub render_hints: Vec<String>,
}

/// Renderable view of one field effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEffectSnapshot {
    /// Effect id.
    pub id: u64,
    /// Effect kind.
    pub kind: FieldEffectKind,
    /// Center position.
    pub center: Vec2,
    /// Effect radius.
    pub radius: f32,
    /// Expiry timestamp.
    pub expires_at: u64,
}

/// Combat state snapshot handed to the session/render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    /// Timestamp of the tick that produced this snapshot.
    pub now_ms: u64,
    /// Player views.
    pub players: Vec<PlayerSnapshot>,
    /// Field effect views.
    pub field_effects: Vec<FieldEffectSnapshot>,
}

impl ArenaSnapshot {
    /// Serialize the snapshot for the session layer.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidState`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| CombatError::InvalidState(format!("failed to serialize snapshot: {e}")))
    }

    /// Deserialize a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidState`] if the bytes are not a
    /// valid snapshot.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| CombatError::InvalidState(format!("failed to deserialize snapshot: {e}")))
    }
}
