//! Radar display mapping for the threat simulator.
//!
//! Pure functions from `GameStateSnapshot` to display-space geometry. No
//! rendering backend lives here; a host draws the `RadarScene` however it
//! likes and feeds pointer positions back through `RadarProjection::to_world`.

pub mod projection;
pub mod scene;

pub use projection::{sweep_angle, to_polar, DisplayPoint, RadarProjection};
pub use scene::RadarScene;
pub use threatsim_core as core;
