//! Simulation engine for the threat simulator.
//!
//! Owns the hecs ECS world, runs systems once per host frame, and produces
//! GameStateSnapshots for the presentation layer.

pub mod config;
pub mod engine;
pub mod feed;
pub mod ledger;
pub mod score;
pub mod selection;
pub mod session;
pub mod synergy;
pub mod systems;
pub mod weapons;
pub mod world_setup;

pub use config::SimConfig;
pub use engine::{PointerAction, ShotReport, SimulationEngine};
pub use session::SessionSlot;
pub use threatsim_core as core;

#[cfg(test)]
mod tests;
