//! Bullet effects, ordinance kinds and weapon assembly.
//!
//! A weapon is assembled from an externally supplied [`WeaponConfig`]
//! (point allocations plus named bullet effects and an ordinance kind)
//! against a [`ArsenalCatalog`] of known definitions. Assembly enforces
//! the global point budget; the resulting [`Weapon`] is stat-immutable,
//! only its ammo count changes afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attributes::{compute, AttributeKind};
use crate::error::{CombatError, Result};

/// The point budget a weapon configuration may spend in total across
/// attribute allocations, bullet effects and the ordinance choice.
pub const POINT_BUDGET: i32 = 100;

/// Name of the baseline ordinance used when a configured name is unknown.
pub const DEFAULT_ORDINANCE: &str = "bullet";

/// A named add-on behavior attached to a weapon's projectiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletEffect {
    /// Unique effect name ("piercing", "homing", ...).
    pub name: String,
    /// Point cost of carrying this effect.
    pub cost: i32,
}

/// A projectile/ammunition kind with its physical modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordinance {
    /// Unique ordinance name ("bullet", "rocket", ...).
    pub name: String,
    /// Point cost of firing this ordinance.
    pub cost: i32,
    /// Projectile radius in world units.
    pub radius: f32,
    /// Multiplier applied to the computed projectile speed.
    pub speed_multiplier: f32,
    /// Whether the projectile renders a trail.
    pub trail: bool,
    /// Area-of-effect radius modifier (0 = no area effect).
    pub area_effect: f32,
    /// Minimum projectile velocity (world units per second).
    pub min_velocity: f32,
}

impl Ordinance {
    /// The baseline ordinance, used when a catalog has no "bullet" entry.
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            name: DEFAULT_ORDINANCE.to_string(),
            cost: 0,
            radius: 1.0,
            speed_multiplier: 1.0,
            trail: false,
            area_effect: 0.0,
            min_velocity: 0.0,
        }
    }
}

/// Serialized form of an [`ArsenalCatalog`], loadable from RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogData {
    #[serde(default)]
    bullet_effects: Vec<BulletEffect>,
    #[serde(default)]
    ordinances: Vec<Ordinance>,
}

/// Registry of known bullet effects and ordinance kinds.
///
/// Definitions are data-driven: the built-in set covers the stock game,
/// and additional entries can be loaded from RON for balance experiments
/// without recompiling.
#[derive(Debug, Clone, Default)]
pub struct ArsenalCatalog {
    bullet_effects: HashMap<String, BulletEffect>,
    ordinances: HashMap<String, Ordinance>,
}

impl ArsenalCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the stock bullet effects and ordinance kinds.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        for (name, cost) in [("piercing", 15), ("homing", 25), ("explosive", 20)] {
            catalog.register_bullet_effect(BulletEffect {
                name: name.to_string(),
                cost,
            });
        }

        catalog.register_ordinance(Ordinance::baseline());
        catalog.register_ordinance(Ordinance {
            name: "rocket".to_string(),
            cost: 20,
            radius: 3.0,
            speed_multiplier: 0.5,
            trail: true,
            area_effect: 40.0,
            min_velocity: 0.0,
        });
        catalog.register_ordinance(Ordinance {
            name: "grenade".to_string(),
            cost: 15,
            radius: 2.5,
            speed_multiplier: 0.6,
            trail: false,
            area_effect: 30.0,
            min_velocity: 20.0,
        });
        catalog.register_ordinance(Ordinance {
            name: "plasma".to_string(),
            cost: 10,
            radius: 1.5,
            speed_multiplier: 0.8,
            trail: true,
            area_effect: 0.0,
            min_velocity: 0.0,
        });

        catalog
    }

    /// Load a catalog from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::CatalogParse`] if the text is not valid
    /// catalog RON.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let data: CatalogData =
            ron::from_str(text).map_err(|e| CombatError::CatalogParse(e.to_string()))?;
        let mut catalog = Self::new();
        for effect in data.bullet_effects {
            catalog.register_bullet_effect(effect);
        }
        for ordinance in data.ordinances {
            catalog.register_ordinance(ordinance);
        }
        Ok(catalog)
    }

    /// Register a bullet effect, replacing any existing one with the same name.
    pub fn register_bullet_effect(&mut self, effect: BulletEffect) {
        self.bullet_effects.insert(effect.name.clone(), effect);
    }

    /// Register an ordinance kind, replacing any existing one with the same name.
    pub fn register_ordinance(&mut self, ordinance: Ordinance) {
        self.ordinances.insert(ordinance.name.clone(), ordinance);
    }

    /// Look up a bullet effect by name.
    #[must_use]
    pub fn bullet_effect(&self, name: &str) -> Option<&BulletEffect> {
        self.bullet_effects.get(name)
    }

    /// Look up an ordinance kind by name.
    #[must_use]
    pub fn ordinance(&self, name: &str) -> Option<&Ordinance> {
        self.ordinances.get(name)
    }
}

/// Weapon configuration payload from the session layer.
///
/// Field names mirror the wire structure the session layer delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponConfig {
    /// Display name of the weapon.
    #[serde(rename = "type")]
    pub name: String,
    /// Points allocated to damage.
    pub damage: i32,
    /// Points allocated to fire rate.
    pub fire_rate: i32,
    /// Points allocated to range.
    pub range: i32,
    /// Points allocated to accuracy.
    pub accuracy: i32,
    /// Points allocated to magazine size.
    pub magazine_size: i32,
    /// Points allocated to reload time.
    pub reload_time: i32,
    /// Points allocated to projectile speed.
    pub projectile_speed: i32,
    /// Points allocated to bullets per shot.
    pub bullets_per_shot: i32,
    /// Points allocated to linear damping.
    pub linear_damping: i32,
    /// Names of bullet effects to attach.
    #[serde(default)]
    pub bullet_effects: Vec<String>,
    /// Name of the ordinance kind to fire.
    #[serde(default = "default_ordinance_name")]
    pub ordinance: String,
}

fn default_ordinance_name() -> String {
    DEFAULT_ORDINANCE.to_string()
}

impl WeaponConfig {
    /// Points allocated to one attribute.
    #[must_use]
    pub const fn points(&self, kind: AttributeKind) -> i32 {
        match kind {
            AttributeKind::Damage => self.damage,
            AttributeKind::FireRate => self.fire_rate,
            AttributeKind::Range => self.range,
            AttributeKind::Accuracy => self.accuracy,
            AttributeKind::MagazineSize => self.magazine_size,
            AttributeKind::ReloadTime => self.reload_time,
            AttributeKind::ProjectileSpeed => self.projectile_speed,
            AttributeKind::BulletsPerShot => self.bullets_per_shot,
            AttributeKind::LinearDamping => self.linear_damping,
        }
    }

    /// Sum of all attribute point allocations.
    #[must_use]
    pub fn attribute_points(&self) -> i32 {
        AttributeKind::ALL
            .iter()
            .map(|&kind| self.points(kind))
            .sum()
    }
}

/// Computed weapon statistics.
///
/// This is the read-only view status effects transform; the stored base
/// stats of a [`Weapon`] are never mutated after assembly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Damage per bullet.
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Projectile range in world units.
    pub range: f32,
    /// Spread factor (1.0 = perfect accuracy).
    pub accuracy: f32,
    /// Rounds per magazine.
    pub magazine_size: u32,
    /// Seconds to reload.
    pub reload_time: f32,
    /// Projectile speed after the ordinance multiplier.
    pub projectile_speed: f32,
    /// Bullets fired per trigger pull.
    pub bullets_per_shot: u32,
    /// Linear damping applied to the wielder.
    pub linear_damping: f32,
}

/// An assembled weapon.
///
/// Stats are immutable once assembled; only the ammo count changes
/// through [`fire`](Weapon::fire) and [`reload`](Weapon::reload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    name: String,
    stats: WeaponStats,
    bullet_effects: Vec<BulletEffect>,
    ordinance: Ordinance,
    ammo: u32,
}

impl Weapon {
    /// Assemble a weapon from a configuration payload.
    ///
    /// Unknown bullet-effect names are skipped with a warning; an unknown
    /// ordinance name falls back to the baseline bullet. Both are
    /// recoverable configuration mistakes, not build failures.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PointsOutOfRange`] if any attribute
    /// allocation is outside its valid range, or
    /// [`CombatError::BudgetExceeded`] if the total cost exceeds
    /// [`POINT_BUDGET`].
    pub fn assemble(config: &WeaponConfig, catalog: &ArsenalCatalog) -> Result<Self> {
        // Resolve named parts first so their costs enter the budget check.
        let mut bullet_effects: Vec<BulletEffect> = Vec::new();
        for name in &config.bullet_effects {
            match catalog.bullet_effect(name) {
                Some(effect) => {
                    if !bullet_effects.iter().any(|e| e.name == effect.name) {
                        bullet_effects.push(effect.clone());
                    }
                }
                None => {
                    tracing::warn!(effect = %name, "unknown bullet effect in config, skipping");
                }
            }
        }

        let ordinance = match catalog.ordinance(&config.ordinance) {
            Some(ordinance) => ordinance.clone(),
            None => {
                tracing::warn!(
                    ordinance = %config.ordinance,
                    "unknown ordinance in config, using baseline bullet"
                );
                catalog
                    .ordinance(DEFAULT_ORDINANCE)
                    .cloned()
                    .unwrap_or_else(Ordinance::baseline)
            }
        };

        let total = config.attribute_points()
            + bullet_effects.iter().map(|e| e.cost).sum::<i32>()
            + ordinance.cost;
        if total > POINT_BUDGET {
            return Err(CombatError::BudgetExceeded {
                total,
                budget: POINT_BUDGET,
            });
        }

        let projectile_speed = compute(
            AttributeKind::ProjectileSpeed,
            config.points(AttributeKind::ProjectileSpeed),
        )? * ordinance.speed_multiplier;

        let stats = WeaponStats {
            damage: compute(AttributeKind::Damage, config.damage)?,
            fire_rate: compute(AttributeKind::FireRate, config.fire_rate)?,
            range: compute(AttributeKind::Range, config.range)?,
            accuracy: compute(AttributeKind::Accuracy, config.accuracy)?,
            magazine_size: compute(AttributeKind::MagazineSize, config.magazine_size)? as u32,
            reload_time: compute(AttributeKind::ReloadTime, config.reload_time)?,
            projectile_speed,
            bullets_per_shot: compute(AttributeKind::BulletsPerShot, config.bullets_per_shot)?
                as u32,
            linear_damping: compute(AttributeKind::LinearDamping, config.linear_damping)?,
        };

        Ok(Self {
            name: config.name.clone(),
            ammo: stats.magazine_size,
            stats,
            bullet_effects,
            ordinance,
        })
    }

    /// Weapon display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base stats (unmodified by status effects).
    #[must_use]
    pub const fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    /// Bullet effects attached to this weapon.
    #[must_use]
    pub fn bullet_effects(&self) -> &[BulletEffect] {
        &self.bullet_effects
    }

    /// Check if the weapon carries a named bullet effect.
    #[must_use]
    pub fn has_bullet_effect(&self, name: &str) -> bool {
        self.bullet_effects.iter().any(|e| e.name == name)
    }

    /// The ordinance kind this weapon fires.
    #[must_use]
    pub const fn ordinance(&self) -> &Ordinance {
        &self.ordinance
    }

    /// Current ammo count.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Fire one shot, decrementing ammo (floor 0).
    ///
    /// Returns `true` if a shot was actually fired.
    pub fn fire(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    /// Refill ammo to the magazine size.
    pub fn reload(&mut self) {
        self.ammo = self.stats.magazine_size;
    }

    /// Check if the magazine is not full.
    #[must_use]
    pub const fn needs_reload(&self) -> bool {
        self.ammo < self.stats.magazine_size
    }
}
