use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use plate_types::Affordance;

/// Receives visibility requests for auxiliary UI controls.
///
/// The selection state machine calls this whenever a transition changes what
/// the user may do next. Requests are idempotent: showing a visible control
/// or hiding a hidden one must be harmless.
pub trait AffordanceController {
    fn show(&mut self, kind: Affordance);
    fn hide(&mut self, kind: Affordance);

    fn set_visible(&mut self, kind: Affordance, visible: bool) {
        if visible {
            self.show(kind);
        } else {
            self.hide(kind);
        }
    }
}

/// A visibility flip that actually changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityChange {
    pub kind: Affordance,
    pub visible: bool,
}

/// Controller that remembers the current visibility of every affordance and
/// the changes made since it was last drained.
#[derive(Debug, Clone, Default)]
pub struct VisibilityTracker {
    visible: BTreeSet<Affordance>,
    changes: Vec<VisibilityChange>,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, kind: Affordance) -> bool {
        self.visible.contains(&kind)
    }

    pub fn visible(&self) -> Vec<Affordance> {
        self.visible.iter().copied().collect()
    }

    pub fn take_changes(&mut self) -> Vec<VisibilityChange> {
        std::mem::take(&mut self.changes)
    }
}

impl AffordanceController for VisibilityTracker {
    fn show(&mut self, kind: Affordance) {
        if self.visible.insert(kind) {
            self.changes.push(VisibilityChange {
                kind,
                visible: true,
            });
        }
    }

    fn hide(&mut self, kind: Affordance) {
        if self.visible.remove(&kind) {
            self.changes.push(VisibilityChange {
                kind,
                visible: false,
            });
        }
    }
}
