//! Radar projection: converts between world coordinates and display space.
//!
//! The defended asset sits at the display center. World +y (North) points up
//! the screen, so display y grows downward. Positions beyond the display range
//! are pinned to the outer ring along their bearing.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use threatsim_core::constants::RADAR_MAX_RANGE;
use threatsim_core::types::Position;

/// Default sweep period (ms per revolution).
pub const SWEEP_PERIOD_MS: f64 = 4_000.0;

/// Smallest zoom factor and ring radius the projection will use.
pub const MIN_SCALE: f64 = 0.01;
pub const MIN_RADIUS_PX: f64 = 1.0;

/// A point in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl From<DVec2> for DisplayPoint {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<DisplayPoint> for DVec2 {
    fn from(p: DisplayPoint) -> Self {
        DVec2::new(p.x, p.y)
    }
}

/// Stateless world <-> display transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarProjection {
    /// Display position of the asset.
    pub center: DisplayPoint,
    /// Radius of the outer ring in pixels.
    pub radius_px: f64,
    /// World range shown at the outer ring at zoom 1.
    pub max_range: f64,
    /// Zoom factor. 2.0 shows half the range at the same ring size.
    pub scale: f64,
}

impl RadarProjection {
    /// Fit the radar into a `width × height` viewport.
    pub fn fit(width: f64, height: f64) -> Self {
        Self {
            center: DisplayPoint {
                x: width / 2.0,
                y: height / 2.0,
            },
            radius_px: (width.min(height) / 2.0).max(MIN_RADIUS_PX),
            max_range: RADAR_MAX_RANGE,
            scale: 1.0,
        }
    }

    /// Set the zoom factor, floored at `MIN_SCALE`.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale.max(MIN_SCALE);
        self
    }

    /// Move the asset off-center, e.g. when panning.
    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.center = DisplayPoint { x, y };
        self
    }

    /// Pixels per world unit. Always positive and finite.
    pub fn px_per_unit(&self) -> f64 {
        self.radius_px.max(MIN_RADIUS_PX) * self.scale.max(MIN_SCALE) / self.max_range.max(1.0)
    }

    /// World range visible at the outer ring.
    pub fn visible_range(&self) -> f64 {
        self.max_range / self.scale.max(MIN_SCALE)
    }

    /// Whether a position lies beyond the outer ring.
    pub fn is_clamped(&self, pos: &Position) -> bool {
        pos.range_from_origin() > self.visible_range()
    }

    /// Project a world position. Never lands outside the outer ring.
    pub fn to_display(&self, pos: &Position) -> DisplayPoint {
        let mut offset = DVec2::new(pos.x, -pos.y) * self.px_per_unit();
        if offset.length() > self.radius_px {
            offset = offset.normalize_or_zero() * self.radius_px;
        }
        (DVec2::from(self.center) + offset).into()
    }

    /// Inverse of `to_display` for points inside the ring. Altitude is zero.
    pub fn to_world(&self, point: DisplayPoint) -> Position {
        let offset = (DVec2::from(point) - DVec2::from(self.center)) / self.px_per_unit();
        Position::planar(offset.x, -offset.y)
    }

    /// Range-ring radii in pixels, innermost first, outer ring last.
    pub fn ring_radii(&self, count: usize) -> Vec<f64> {
        (1..=count)
            .map(|i| self.radius_px * i as f64 / count as f64)
            .collect()
    }
}

/// Horizontal range and bearing (radians, 0 = North, clockwise) from the asset.
pub fn to_polar(pos: &Position) -> (f64, f64) {
    (pos.range_from_origin(), Position::default().bearing_to(pos))
}

/// Sweep line bearing at `now_ms` (radians, 0 = North, clockwise).
pub fn sweep_angle(now_ms: f64, period_ms: f64) -> f64 {
    (now_ms / period_ms).rem_euclid(1.0) * std::f64::consts::TAU
}
