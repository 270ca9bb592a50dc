//! Hover and lock state for holes and edges.
//!
//! Two orthogonal axes:
//! - holes: at most one hovered, at most one locked. While a hole is locked
//!   hover updates are ignored entirely.
//! - edges: at most one hovered, and an ordered list of up to
//!   [`MAX_LOCKED_EDGES`] locked edges. Exactly two locked edges make the
//!   weld/fold choice available.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use plate_types::{Affordance, EdgeId, HoleId, Modifiers};

use crate::affordance::AffordanceController;

pub const MAX_LOCKED_EDGES: usize = 2;

/// Coarse state of the hover/hole-lock axis. `HoverOnly` means a hole or
/// an edge candidate is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HolePhase {
    #[default]
    Idle,
    HoverOnly,
    HoleLocked,
}

/// Both selection axes at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionPhase {
    pub hole: HolePhase,
    /// Number of locked edges, at most [`MAX_LOCKED_EDGES`].
    pub edges_locked: usize,
}

/// What a click did to the hole lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoleLockChange {
    Unchanged,
    Locked(HoleId),
    Unlocked(HoleId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOutcome {
    pub hole: HoleLockChange,
    pub locked_edges: Vec<EdgeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    hovered_hole: Option<HoleId>,
    hovered_edge: Option<EdgeId>,
    locked_hole: Option<HoleId>,
    locked_edges: Vec<EdgeId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered_hole(&self) -> Option<HoleId> {
        self.hovered_hole
    }

    pub fn hovered_edge(&self) -> Option<EdgeId> {
        self.hovered_edge
    }

    pub fn locked_hole(&self) -> Option<HoleId> {
        self.locked_hole
    }

    pub fn locked_edges(&self) -> &[EdgeId] {
        &self.locked_edges
    }

    /// Hover tracking is suspended while a hole is locked.
    pub fn hover_enabled(&self) -> bool {
        self.locked_hole.is_none()
    }

    pub fn phase(&self) -> SelectionPhase {
        let hole = if self.locked_hole.is_some() {
            HolePhase::HoleLocked
        } else if self.hovered_hole.is_some() || self.hovered_edge.is_some() {
            HolePhase::HoverOnly
        } else {
            HolePhase::Idle
        };
        SelectionPhase {
            hole,
            edges_locked: self.locked_edges.len(),
        }
    }

    /// The edge is hovered or locked, so it should draw highlighted.
    pub fn edge_highlighted(&self, id: EdgeId) -> bool {
        self.hovered_edge == Some(id) || self.locked_edges.contains(&id)
    }

    /// Record the candidates under the pointer. Returns `false` and changes
    /// nothing while a hole is locked.
    pub fn set_hover(
        &mut self,
        hole: Option<HoleId>,
        edge: Option<EdgeId>,
        ui: &mut dyn AffordanceController,
    ) -> bool {
        if !self.hover_enabled() {
            return false;
        }
        if self.hovered_hole != hole || self.hovered_edge != edge {
            debug!(?hole, ?edge, "hover changed");
        }
        self.hovered_hole = hole;
        self.hovered_edge = edge;
        ui.set_visible(Affordance::Tooltip, hole.is_some());
        true
    }

    /// Nothing under the pointer, or no plate to pick against.
    pub fn clear_hover(&mut self, ui: &mut dyn AffordanceController) -> bool {
        self.set_hover(None, None, ui)
    }

    /// Apply a click using the candidates from the most recent hover.
    pub fn click(&mut self, modifiers: Modifiers, ui: &mut dyn AffordanceController) -> ClickOutcome {
        let hole = self.hovered_hole;
        let edge = self.hovered_edge;

        let hole_change = match hole {
            Some(id) => self.toggle_hole(id, ui),
            None => HoleLockChange::Unchanged,
        };

        match (hole, edge) {
            (_, Some(id)) => self.lock_edge(id, modifiers, ui),
            (None, None) => {
                if !self.locked_edges.is_empty() {
                    info!("click on empty space, clearing locked edges");
                }
                self.locked_edges.clear();
                ui.hide(Affordance::WeldFold);
            }
            (Some(_), None) => {}
        }
        debug!(phase = ?self.phase(), "click applied");

        ClickOutcome {
            hole: hole_change,
            locked_edges: self.locked_edges.clone(),
        }
    }

    fn toggle_hole(&mut self, id: HoleId, ui: &mut dyn AffordanceController) -> HoleLockChange {
        if self.locked_hole == Some(id) {
            info!(hole = %id, "hole unlocked");
            self.locked_hole = None;
            self.hovered_hole = None;
            ui.hide(Affordance::StudUpload);
            ui.hide(Affordance::DiameterEdit);
            ui.hide(Affordance::Tooltip);
            HoleLockChange::Unlocked(id)
        } else {
            info!(hole = %id, "hole locked");
            self.locked_hole = Some(id);
            ui.show(Affordance::StudUpload);
            ui.show(Affordance::DiameterEdit);
            HoleLockChange::Locked(id)
        }
    }

    fn lock_edge(&mut self, id: EdgeId, modifiers: Modifiers, ui: &mut dyn AffordanceController) {
        if !modifiers.multi_select() {
            self.locked_edges.clear();
        } else if self.locked_edges.len() >= MAX_LOCKED_EDGES {
            debug!("third edge clicked, resetting edge selection");
            self.locked_edges.clear();
        }
        if !self.locked_edges.contains(&id) {
            self.locked_edges.push(id);
        }
        info!(edges = ?self.locked_edges, "edge selection changed");
        ui.set_visible(Affordance::WeldFold, self.locked_edges.len() == MAX_LOCKED_EDGES);
    }

    /// Drop all hover and lock state, e.g. when a new model replaces the
    /// current one.
    pub fn reset(&mut self, ui: &mut dyn AffordanceController) {
        *self = Self::default();
        for kind in Affordance::ALL {
            ui.hide(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affordance::VisibilityTracker;

    #[test]
    fn test_hover_shows_tooltip_only_for_holes() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        s.set_hover(None, Some(EdgeId(0)), &mut ui);
        assert!(!ui.is_visible(Affordance::Tooltip));
        assert_eq!(s.phase().hole, HolePhase::HoverOnly);
        s.set_hover(Some(HoleId(1)), None, &mut ui);
        assert!(ui.is_visible(Affordance::Tooltip));
        s.clear_hover(&mut ui);
        assert!(!ui.is_visible(Affordance::Tooltip));
        assert_eq!(s.phase(), SelectionPhase::default());
    }

    #[test]
    fn test_lock_freezes_hover() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        s.set_hover(Some(HoleId(2)), None, &mut ui);
        let out = s.click(Modifiers::NONE, &mut ui);
        assert_eq!(out.hole, HoleLockChange::Locked(HoleId(2)));
        assert!(ui.is_visible(Affordance::StudUpload));
        assert!(ui.is_visible(Affordance::DiameterEdit));

        assert!(!s.set_hover(Some(HoleId(5)), None, &mut ui));
        assert!(!s.clear_hover(&mut ui));
        assert_eq!(s.hovered_hole(), Some(HoleId(2)));
    }

    #[test]
    fn test_second_click_unlocks_and_clears_hole_affordances() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        s.set_hover(Some(HoleId(0)), None, &mut ui);
        s.click(Modifiers::NONE, &mut ui);
        let out = s.click(Modifiers::NONE, &mut ui);
        assert_eq!(out.hole, HoleLockChange::Unlocked(HoleId(0)));
        assert!(s.hover_enabled());
        assert_eq!(s.hovered_hole(), None);
        for kind in [Affordance::StudUpload, Affordance::DiameterEdit, Affordance::Tooltip] {
            assert!(!ui.is_visible(kind));
        }
    }

    #[test]
    fn test_plain_click_keeps_single_edge() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        s.set_hover(None, Some(EdgeId(0)), &mut ui);
        s.click(Modifiers::NONE, &mut ui);
        s.set_hover(None, Some(EdgeId(1)), &mut ui);
        let out = s.click(Modifiers::NONE, &mut ui);
        assert_eq!(out.locked_edges, vec![EdgeId(1)]);
        assert!(!ui.is_visible(Affordance::WeldFold));
    }

    #[test]
    fn test_modifier_reclick_does_not_duplicate() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        s.set_hover(None, Some(EdgeId(4)), &mut ui);
        s.click(Modifiers::ctrl(), &mut ui);
        let out = s.click(Modifiers::ctrl(), &mut ui);
        assert_eq!(out.locked_edges, vec![EdgeId(4)]);
    }

    #[test]
    fn test_empty_click_clears_edges() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        for (n, id) in [0, 1].into_iter().enumerate() {
            s.set_hover(None, Some(EdgeId(id)), &mut ui);
            s.click(Modifiers::ctrl(), &mut ui);
            assert_eq!(s.phase().edges_locked, n + 1);
        }
        assert!(ui.is_visible(Affordance::WeldFold));
        s.clear_hover(&mut ui);
        let out = s.click(Modifiers::NONE, &mut ui);
        assert!(out.locked_edges.is_empty());
        assert!(!ui.is_visible(Affordance::WeldFold));
        assert_eq!(s.phase().edges_locked, 0);
    }

    #[test]
    fn test_hole_click_leaves_edges_alone() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        s.set_hover(None, Some(EdgeId(3)), &mut ui);
        s.click(Modifiers::NONE, &mut ui);
        s.set_hover(Some(HoleId(0)), None, &mut ui);
        let out = s.click(Modifiers::NONE, &mut ui);
        assert_eq!(out.locked_edges, vec![EdgeId(3)]);
        assert_eq!(s.locked_hole(), Some(HoleId(0)));
        assert_eq!(
            s.phase(),
            SelectionPhase {
                hole: HolePhase::HoleLocked,
                edges_locked: 1,
            }
        );
    }

    #[test]
    fn test_reset_hides_everything() {
        let mut s = SelectionState::new();
        let mut ui = VisibilityTracker::new();
        s.set_hover(Some(HoleId(0)), Some(EdgeId(0)), &mut ui);
        s.click(Modifiers::NONE, &mut ui);
        s.reset(&mut ui);
        assert_eq!(s, SelectionState::new());
        assert!(ui.visible().is_empty());
    }
}
