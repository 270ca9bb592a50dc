use picking_core::{PickError, SelectionView, ViewerSession, VisibilityTracker};

use crate::messages::ViewerToUi;

/// Session state owned by the bridge for one viewer.
///
/// The tracker stands in for the page's controls: it records what should be
/// visible so each response can carry the current set plus what changed.
#[derive(Debug, Default)]
pub struct BridgeState {
    pub session: ViewerSession,
    pub ui: VisibilityTracker,
}

impl BridgeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the selection for the page, draining pending visibility
    /// changes.
    pub fn selection_changed(&mut self) -> ViewerToUi {
        ViewerToUi::SelectionChanged {
            view: self.session.view(),
            visible: self.ui.visible(),
            changes: self.ui.take_changes(),
        }
    }

    pub fn view(&self) -> SelectionView {
        self.session.view()
    }
}

/// Errors that can occur in the bridge layer.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Pick(#[from] PickError),

    #[error("failed to parse message: {reason}")]
    Parse { reason: String },
}
