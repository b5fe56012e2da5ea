//! Point-budget attribute curves.
//!
//! Every weapon attribute maps allocated points to a concrete stat value
//! through a small parameter table (base + points * scale, with an
//! optional cap on contributing points and optional integer truncation).
//! The table is data, not code, so balance tuning never touches logic.
//!
//! These curves are a compatibility contract with the session layer and
//! existing clients and must be reproduced exactly.

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

/// The nine tunable weapon attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Damage per bullet.
    Damage,
    /// Shots per second.
    FireRate,
    /// Projectile lifetime range in world units.
    Range,
    /// Spread factor (1.0 = perfect accuracy).
    Accuracy,
    /// Rounds per magazine.
    MagazineSize,
    /// Seconds to reload.
    ReloadTime,
    /// Projectile speed in world units per second (before the ordinance
    /// multiplier is applied at assembly).
    ProjectileSpeed,
    /// Bullets fired per trigger pull.
    BulletsPerShot,
    /// Linear damping applied to the wielder.
    LinearDamping,
}

impl AttributeKind {
    /// All attribute kinds, in the order the configuration payload lists them.
    pub const ALL: [AttributeKind; 9] = [
        AttributeKind::Damage,
        AttributeKind::FireRate,
        AttributeKind::Range,
        AttributeKind::Accuracy,
        AttributeKind::MagazineSize,
        AttributeKind::ReloadTime,
        AttributeKind::ProjectileSpeed,
        AttributeKind::BulletsPerShot,
        AttributeKind::LinearDamping,
    ];

    /// Curve parameters for this attribute.
    #[must_use]
    pub const fn curve(self) -> Curve {
        match self {
            AttributeKind::Damage => Curve {
                min: 0,
                max: 40,
                base: 10.0,
                scale: 1.0,
                cap: Some(40),
                truncate: false,
            },
            AttributeKind::FireRate => Curve {
                min: 0,
                max: 30,
                base: 0.3,
                scale: 0.3,
                cap: None,
                truncate: false,
            },
            AttributeKind::Range => Curve {
                min: -10,
                max: 25,
                base: 300.0,
                scale: 300.0,
                cap: None,
                truncate: false,
            },
            AttributeKind::Accuracy => Curve {
                min: -10,
                max: 0,
                base: 1.0,
                scale: 0.02,
                cap: None,
                truncate: false,
            },
            AttributeKind::MagazineSize => Curve {
                min: 0,
                max: 30,
                base: 5.0,
                scale: 1.0,
                cap: None,
                truncate: true,
            },
            AttributeKind::ReloadTime => Curve {
                min: -7,
                max: 25,
                base: 4.0,
                scale: -0.14,
                cap: None,
                truncate: false,
            },
            AttributeKind::ProjectileSpeed => Curve {
                min: 0,
                max: 30,
                base: 120.0,
                scale: 15.0,
                cap: None,
                truncate: false,
            },
            AttributeKind::BulletsPerShot => Curve {
                min: 0,
                max: 33,
                base: 1.0,
                scale: 1.0 / 3.0,
                cap: None,
                truncate: true,
            },
            AttributeKind::LinearDamping => Curve {
                min: -10,
                max: 0,
                base: 0.03,
                scale: -0.04,
                cap: None,
                truncate: false,
            },
        }
    }
}

/// Parameters for one attribute's point-to-value curve.
///
/// `value = base + min(points, cap) * scale`, truncated to an integer
/// when `truncate` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Minimum valid points (inclusive).
    pub min: i32,
    /// Maximum valid points (inclusive).
    pub max: i32,
    /// Value at zero points.
    pub base: f32,
    /// Value gained per point.
    pub scale: f32,
    /// Cap on contributing points, applied before scaling.
    pub cap: Option<i32>,
    /// Truncate the result to a whole number.
    pub truncate: bool,
}

impl Curve {
    /// Evaluate the curve at an already-validated point count.
    #[must_use]
    pub fn value(&self, points: i32) -> f32 {
        let contributing = match self.cap {
            Some(cap) => points.min(cap),
            None => points,
        };
        let value = self.base + contributing as f32 * self.scale;
        if self.truncate {
            value.trunc()
        } else {
            value
        }
    }

    /// Check whether a point count is within the valid range.
    #[must_use]
    pub const fn contains(&self, points: i32) -> bool {
        points >= self.min && points <= self.max
    }
}

/// Compute the stat value for an attribute at the given point allocation.
///
/// # Errors
///
/// Returns [`CombatError::PointsOutOfRange`] if `points` is outside the
/// attribute's valid range.
pub fn compute(kind: AttributeKind, points: i32) -> Result<f32> {
    let curve = kind.curve();
    if !curve.contains(points) {
        return Err(CombatError::PointsOutOfRange {
            attribute: kind,
            points,
            min: curve.min,
            max: curve.max,
        });
    }
    Ok(curve.value(points))
}
