//! Threat AI for the threat simulation.
//!
//! Implements threat behavior state machines and kind-driven flight profiles.

pub mod fsm;
pub mod profiles;

pub use threatsim_core as core;
