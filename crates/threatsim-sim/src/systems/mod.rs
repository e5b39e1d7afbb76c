//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They own no state. Everything lives in components or is passed in.

pub mod auto_target;
pub mod cleanup;
pub mod drones;
pub mod lifecycle;
pub mod movement;
pub mod power_ups;
pub mod snapshot;
pub mod threat_ai;
pub mod wave_spawner;
