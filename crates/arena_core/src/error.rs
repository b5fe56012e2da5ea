//! Error types for the combat core.

use thiserror::Error;

use crate::attributes::AttributeKind;

/// Result type alias using [`CombatError`].
pub type Result<T> = std::result::Result<T, CombatError>;

/// Top-level error type for all combat-core errors.
#[derive(Debug, Error)]
pub enum CombatError {
    /// Attribute points outside the valid range for that attribute.
    #[error("{attribute:?} points {points} outside valid range [{min}, {max}]")]
    PointsOutOfRange {
        /// The attribute being allocated.
        attribute: AttributeKind,
        /// Points requested.
        points: i32,
        /// Minimum valid points.
        min: i32,
        /// Maximum valid points.
        max: i32,
    },

    /// Total weapon cost exceeds the point budget.
    #[error("weapon cost {total} exceeds budget of {budget} points")]
    BudgetExceeded {
        /// Total cost of the requested configuration.
        total: i32,
        /// The point budget.
        budget: i32,
    },

    /// Referenced player is not registered in the arena.
    #[error("player not found: {0}")]
    PlayerNotFound(u64),

    /// Referenced field effect does not exist.
    #[error("field effect not found: {0}")]
    FieldEffectNotFound(u64),

    /// Catalog data failed to parse.
    #[error("failed to parse catalog data: {0}")]
    CatalogParse(String),

    /// Invalid combat state.
    #[error("invalid combat state: {0}")]
    InvalidState(String),
}
