//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// Stable identifier of a threat. Selection and priority state hold these,
/// never entity handles, so they survive ticks.
pub type ThreatId = u32;

/// Stable identifier of a deployed drone.
pub type DroneId = u32;

/// Stable identifier of a power-up pickup.
pub type PowerUpId = u32;

/// Position in world space (world units, Cartesian).
/// x = East, y = North, z = altitude. The defended asset sits at the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Axis-aligned rectangle in world space, used for drag selection.
/// Corners may be given in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of active ticks processed.
    pub tick: u64,
    /// Simulation clock in milliseconds. Excludes paused time.
    pub now_ms: f64,
    /// Length of the last integration step in seconds (clamped).
    pub dt_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Ground-plane point (altitude zero).
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Range to another position (3D distance).
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Horizontal range (ignoring altitude).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Horizontal distance from the defended asset at the origin.
    pub fn range_from_origin(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Bearing to another position in radians (0 = North, clockwise).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.atan2(dy).rem_euclid(std::f64::consts::TAU)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Horizontal speed (ignoring vertical component).
    pub fn horizontal_speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Heading in radians (0 = North, clockwise).
    pub fn heading(&self) -> f64 {
        self.x.atan2(self.y).rem_euclid(std::f64::consts::TAU)
    }

    pub fn scaled(&self, factor: f64) -> Velocity {
        Velocity::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl Rect {
    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.start_x.min(self.end_x)
    }

    pub fn max_x(&self) -> f64 {
        self.start_x.max(self.end_x)
    }

    pub fn min_y(&self) -> f64 {
        self.start_y.min(self.end_y)
    }

    pub fn max_y(&self) -> f64 {
        self.start_y.max(self.end_y)
    }

    /// Whether a position's ground-plane projection lies inside (edges inclusive).
    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= self.min_x() && pos.x <= self.max_x() && pos.y >= self.min_y() && pos.y <= self.max_y()
    }

    /// Length of the diagonal; small diagonals are treated as clicks.
    pub fn diagonal(&self) -> f64 {
        let dx = self.end_x - self.start_x;
        let dy = self.end_y - self.start_y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl SimTime {
    /// Advance the clock to `now_ms`, recording the clamped integration step.
    pub fn advance_to(&mut self, now_ms: f64) {
        let delta_ms = (now_ms - self.now_ms).max(0.0);
        self.dt_secs = delta_ms.min(crate::constants::MAX_FRAME_DELTA_MS) / 1000.0;
        self.now_ms = now_ms.max(self.now_ms);
        self.tick += 1;
    }
}
