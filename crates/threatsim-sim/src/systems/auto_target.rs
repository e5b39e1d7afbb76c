//! Auto-targeting: picks the best target for the selected weapon.
//!
//! Read-only. Candidates are targetable threats within weapon range, ranked by
//! priority (high first, unassigned last), then selection, then range, then id.

use std::cmp::Ordering;

use hecs::World;

use threatsim_core::components::ThreatInfo;
use threatsim_core::enums::PriorityLevel;
use threatsim_core::types::{Position, ThreatId};

use crate::selection::SelectionState;

/// A ranked firing candidate.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub id: ThreatId,
    pub range: f64,
    pub priority: Option<PriorityLevel>,
    pub selected: bool,
}

fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    // Option<PriorityLevel> orders None below Low, so reverse for high-first.
    b.priority
        .cmp(&a.priority)
        .then(b.selected.cmp(&a.selected))
        .then(a.range.total_cmp(&b.range))
        .then(a.id.cmp(&b.id))
}

/// Best target within `max_range` of the asset, if any.
pub fn pick_target(world: &World, selection: &SelectionState, max_range: f64) -> Option<ThreatId> {
    world
        .query::<(&ThreatInfo, &Position)>()
        .iter()
        .filter(|(_, (info, _))| info.is_targetable())
        .map(|(_, (info, pos))| Candidate {
            id: info.id,
            range: pos.range_from_origin(),
            priority: selection.priority(info.id),
            selected: selection.is_selected(info.id),
        })
        .filter(|c| c.range <= max_range)
        .min_by(rank)
        .map(|c| c.id)
}
