//! Threat simulator host.
//!
//! Runs the simulation engine on a fixed-rate thread, forwards player
//! commands to it over a channel, and hands snapshots to a sink. The external
//! renderer is reached only through its manifest.

pub mod game_loop;
pub mod host;
pub mod logging;
pub mod manifest;
pub mod state;

pub use threatsim_core as core;
