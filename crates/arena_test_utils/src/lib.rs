//! # Arena Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Manually advanced clock
//! - Canned entity worlds
//! - Weapon configuration fixtures

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod fixtures;
pub mod world;

pub use clock::ManualClock;
pub use fixtures::{balanced_rifle_config, glass_cannon_config, tank_config};
pub use world::StaticWorld;

/// Re-export proptest for convenience.
pub use proptest;
