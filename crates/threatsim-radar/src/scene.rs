//! Radar scene: everything a renderer needs for one frame, already in
//! display space.

use serde::{Deserialize, Serialize};

use threatsim_core::enums::*;
use threatsim_core::state::{GameStateSnapshot, ThreatView};
use threatsim_core::types::{DroneId, Position, PowerUpId, ThreatId};

use crate::projection::{sweep_angle, DisplayPoint, RadarProjection, SWEEP_PERIOD_MS};

/// Number of range rings drawn inside the outer ring.
pub const RING_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blip {
    pub id: ThreatId,
    pub kind: ThreatKind,
    pub status: ThreatStatus,
    pub at: DisplayPoint,
    pub opacity: f64,
    pub health_fraction: f64,
    pub selected: bool,
    /// Highlighted by the drag box currently open.
    pub previewed: bool,
    pub priority: Option<PriorityLevel>,
    /// Pinned to the outer ring because it is out of display range.
    pub edge: bool,
    pub trail: Vec<DisplayPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneMarker {
    pub id: DroneId,
    pub role: DroneRole,
    pub status: DroneStatus,
    pub at: DisplayPoint,
    pub station: DisplayPoint,
    pub energy_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupMarker {
    pub id: PowerUpId,
    pub kind: PowerUpKind,
    pub at: DisplayPoint,
    pub remaining_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BayMarker {
    pub id: u32,
    pub at: DisplayPoint,
    pub free: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarScene {
    pub center: DisplayPoint,
    pub ring_radii: Vec<f64>,
    pub sweep_angle: f64,
    pub blips: Vec<Blip>,
    pub drones: Vec<DroneMarker>,
    pub bays: Vec<BayMarker>,
    pub power_ups: Vec<PickupMarker>,
    /// Drag box corners (top-left, bottom-right) in display space.
    pub drag_box: Option<(DisplayPoint, DisplayPoint)>,
}

impl RadarScene {
    pub fn from_snapshot(snap: &GameStateSnapshot, projection: &RadarProjection) -> Self {
        let blips = snap
            .threats
            .iter()
            .filter(|t| t.revealed)
            .map(|t| blip(t, snap, projection))
            .collect();

        let drones = snap
            .drones
            .iter()
            .map(|d| DroneMarker {
                id: d.id,
                role: d.role,
                status: d.status,
                at: projection.to_display(&d.position),
                station: projection.to_display(&d.station),
                energy_fraction: fraction(d.energy, d.max_energy),
            })
            .collect();

        let bays = snap
            .bays
            .iter()
            .map(|b| BayMarker {
                id: b.id,
                at: projection.to_display(&b.position),
                free: b.capacity.saturating_sub(b.occupied),
            })
            .collect();

        let power_ups = snap
            .power_ups
            .iter()
            .map(|p| PickupMarker {
                id: p.id,
                kind: p.kind,
                at: projection.to_display(&p.position),
                remaining_ms: p.remaining_ms,
            })
            .collect();

        // World y grows North, display y grows down: the world max_y corner is the top.
        let drag_box = snap.selection.drag_box.map(|rect| {
            let top_left = Position::planar(rect.min_x(), rect.max_y());
            let bottom_right = Position::planar(rect.max_x(), rect.min_y());
            (
                projection.to_display(&top_left),
                projection.to_display(&bottom_right),
            )
        });

        Self {
            center: projection.center,
            ring_radii: projection.ring_radii(RING_COUNT),
            sweep_angle: sweep_angle(snap.time.now_ms, SWEEP_PERIOD_MS),
            blips,
            drones,
            bays,
            power_ups,
            drag_box,
        }
    }

    pub fn blip(&self, id: ThreatId) -> Option<&Blip> {
        self.blips.iter().find(|b| b.id == id)
    }
}

fn blip(t: &ThreatView, snap: &GameStateSnapshot, projection: &RadarProjection) -> Blip {
    Blip {
        id: t.id,
        kind: t.kind,
        status: t.status,
        at: projection.to_display(&t.position),
        opacity: t.opacity,
        health_fraction: fraction(t.health, t.max_health),
        selected: t.selected,
        previewed: snap.selection.preview.contains(&t.id),
        priority: t.priority,
        edge: projection.is_clamped(&t.position),
        trail: t.trail.iter().map(|p| projection.to_display(p)).collect(),
    }
}

fn fraction(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use threatsim_core::state::{BayView, PowerUpView};
    use threatsim_core::types::Rect;

    use super::*;

    fn threat(id: ThreatId, kind: ThreatKind, position: Position, revealed: bool) -> ThreatView {
        ThreatView {
            id,
            kind,
            status: ThreatStatus::Active,
            phase: ThreatPhase::Inbound,
            position,
            range: position.range_from_origin(),
            bearing: 0.0,
            speed: 0.0,
            heading: 0.0,
            health: 30.0,
            max_health: 60.0,
            opacity: 1.0,
            revealed,
            selected: false,
            priority: None,
            trail: vec![position],
        }
    }

    fn radar() -> RadarProjection {
        RadarProjection::fit(600.0, 600.0)
    }

    #[test]
    fn test_hidden_stealth_is_not_drawn() {
        let mut snap = GameStateSnapshot::default();
        snap.threats = vec![
            threat(1, ThreatKind::SingleDrone, Position::new(0.0, 300.0, 100.0), true),
            threat(2, ThreatKind::Stealth, Position::new(0.0, 400.0, 200.0), false),
        ];
        let scene = RadarScene::from_snapshot(&snap, &radar());
        assert_eq!(scene.blips.len(), 1);
        let b = scene.blip(1).unwrap();
        assert_eq!(b.health_fraction, 0.5);
        assert!(!b.edge);
        assert!(scene.blip(2).is_none());
    }

    #[test]
    fn test_far_blip_sits_on_the_edge() {
        let mut snap = GameStateSnapshot::default();
        snap.threats = vec![threat(7, ThreatKind::Kamikaze, Position::new(0.0, 4_000.0, 100.0), true)];
        let scene = RadarScene::from_snapshot(&snap, &radar());
        let b = scene.blip(7).unwrap();
        assert!(b.edge);
        assert!((b.at.y - 0.0).abs() < 1e-9);
        assert!((b.at.x - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_box_and_markers() {
        let mut snap = GameStateSnapshot::default();
        snap.selection.drag_box = Some(Rect::new(100.0, -100.0, -100.0, 100.0));
        snap.bays = vec![BayView {
            id: 0,
            position: Position::planar(0.0, 60.0),
            capacity: 3,
            occupied: 1,
        }];
        snap.power_ups = vec![PowerUpView {
            id: 1,
            kind: PowerUpKind::EnergyCell,
            position: Position::planar(0.0, 0.0),
            remaining_ms: 5_000.0,
        }];
        let scene = RadarScene::from_snapshot(&snap, &radar());

        let (tl, br) = scene.drag_box.unwrap();
        assert!(tl.x < br.x && tl.y < br.y);
        assert_eq!(scene.bays[0].free, 2);
        assert!(scene.bays[0].at.y < 300.0);
        assert_eq!(scene.power_ups[0].at, DisplayPoint { x: 300.0, y: 300.0 });
        assert_eq!(scene.ring_radii.len(), RING_COUNT);
    }
}
