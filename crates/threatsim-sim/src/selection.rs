//! Selection and targeting input model.
//!
//! Holds threat ids, never entity handles. Ids whose threat is gone or no
//! longer active are pruned lazily, when the state is next read.

use std::collections::{BTreeMap, BTreeSet};

use threatsim_core::enums::PriorityLevel;
use threatsim_core::state::SelectionView;
use threatsim_core::types::{Position, Rect, ThreatId};

/// A pointer press that has not been released yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGesture {
    pub start_x: f64,
    pub start_y: f64,
    pub modifier: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: BTreeSet<ThreatId>,
    drag: Option<Rect>,
    preview: BTreeSet<ThreatId>,
    priorities: BTreeMap<ThreatId, PriorityLevel>,
    gesture: Option<PointerGesture>,
}

impl SelectionState {
    pub fn selected(&self) -> &BTreeSet<ThreatId> {
        &self.selected
    }

    pub fn is_selected(&self, id: ThreatId) -> bool {
        self.selected.contains(&id)
    }

    pub fn priority(&self, id: ThreatId) -> Option<PriorityLevel> {
        self.priorities.get(&id).copied()
    }

    pub fn drag_box(&self) -> Option<Rect> {
        self.drag
    }

    /// Replace the selection with `id`, or toggle its membership when `additive`.
    pub fn select(&mut self, id: ThreatId, additive: bool) {
        if additive {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        } else {
            self.selected.clear();
            self.selected.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// `Some` opens or updates the drag box and recomputes the contained
    /// threats from `candidates`. `None` commits the box as the new selection
    /// and clears it; with no box open it does nothing.
    pub fn set_box(&mut self, rect: Option<Rect>, candidates: &[(ThreatId, Position)]) {
        match rect {
            Some(rect) => {
                self.drag = Some(rect);
                self.preview = candidates
                    .iter()
                    .filter(|(_, pos)| rect.contains(pos))
                    .map(|(id, _)| *id)
                    .collect();
            }
            None => {
                if self.drag.take().is_some() {
                    self.selected = std::mem::take(&mut self.preview);
                }
            }
        }
    }

    /// Assign a priority. Independent of selection.
    pub fn set_priority(&mut self, id: ThreatId, level: PriorityLevel) {
        self.priorities.insert(id, level);
    }

    pub fn begin_gesture(&mut self, x: f64, y: f64, modifier: bool) {
        self.gesture = Some(PointerGesture {
            start_x: x,
            start_y: y,
            modifier,
        });
    }

    pub fn gesture(&self) -> Option<PointerGesture> {
        self.gesture
    }

    pub fn end_gesture(&mut self) -> Option<PointerGesture> {
        self.gesture.take()
    }

    /// Drop every id for which `live` is false.
    pub fn prune(&mut self, live: impl Fn(ThreatId) -> bool) {
        self.selected.retain(|id| live(*id));
        self.preview.retain(|id| live(*id));
        self.priorities.retain(|id, _| live(*id));
    }

    pub fn view(&self) -> SelectionView {
        SelectionView {
            selected: self.selected.iter().copied().collect(),
            drag_box: self.drag,
            preview: self.preview.iter().copied().collect(),
            priorities: self.priorities.iter().map(|(id, level)| (*id, *level)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<(ThreatId, Position)> {
        vec![
            (1, Position::new(10.0, 10.0, 100.0)),
            (2, Position::new(50.0, 50.0, 100.0)),
            (3, Position::new(-40.0, 5.0, 100.0)),
        ]
    }

    #[test]
    fn test_plain_select_replaces() {
        let mut s = SelectionState::default();
        s.select(1, false);
        s.select(2, false);
        assert_eq!(s.view().selected, vec![2]);
    }

    #[test]
    fn test_plain_select_idempotent() {
        let mut s = SelectionState::default();
        s.select(3, false);
        let once = s.view().selected;
        s.select(3, false);
        assert_eq!(s.view().selected, once);
    }

    #[test]
    fn test_additive_toggles() {
        let mut s = SelectionState::default();
        s.select(1, false);
        s.select(2, true);
        assert_eq!(s.view().selected, vec![1, 2]);
        s.select(1, true);
        assert_eq!(s.view().selected, vec![2]);
    }

    #[test]
    fn test_box_preview_then_commit() {
        let mut s = SelectionState::default();
        s.select(3, false);
        s.set_box(Some(Rect::new(0.0, 0.0, 20.0, 20.0)), &candidates());
        assert_eq!(s.view().preview, vec![1]);
        // Selection is untouched until commit.
        assert_eq!(s.view().selected, vec![3]);

        s.set_box(Some(Rect::new(0.0, 0.0, 60.0, 60.0)), &candidates());
        assert_eq!(s.view().preview, vec![1, 2]);

        s.set_box(None, &candidates());
        assert_eq!(s.view().selected, vec![1, 2]);
        assert!(s.drag_box().is_none());
        assert!(s.view().preview.is_empty());
    }

    #[test]
    fn test_box_idempotent() {
        let rect = Rect::new(-50.0, 0.0, 60.0, 60.0);
        let mut s = SelectionState::default();
        s.set_box(Some(rect), &candidates());
        let first = s.view().preview;
        s.set_box(Some(rect), &candidates());
        assert_eq!(s.view().preview, first);
    }

    #[test]
    fn test_commit_without_box_is_noop() {
        let mut s = SelectionState::default();
        s.select(2, false);
        s.set_box(None, &candidates());
        assert_eq!(s.view().selected, vec![2]);
    }

    #[test]
    fn test_priority_independent_of_selection() {
        let mut s = SelectionState::default();
        s.set_priority(7, PriorityLevel::High);
        assert!(s.view().selected.is_empty());
        assert_eq!(s.priority(7), Some(PriorityLevel::High));
        s.set_priority(7, PriorityLevel::Low);
        assert_eq!(s.priority(7), Some(PriorityLevel::Low));
    }

    #[test]
    fn test_prune_drops_stale_ids() {
        let mut s = SelectionState::default();
        s.select(1, false);
        s.select(2, true);
        s.set_priority(2, PriorityLevel::Medium);
        s.prune(|id| id != 2);
        assert_eq!(s.view().selected, vec![1]);
        assert_eq!(s.priority(2), None);
    }
}
