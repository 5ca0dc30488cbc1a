//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (arena order)
//! - No rendering or platform dependencies

pub mod ability;
pub mod behavior;
pub mod collision;
pub mod entity;
pub mod ships;
pub mod spawner;
pub mod state;
pub mod tick;

pub use ability::AbilityState;
pub use entity::{Archetype, Entity, Faction, Kind};
pub use ships::{AbilityKind, ShipConfig, ShipKind};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick, toggle_pause};
