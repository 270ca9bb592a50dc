use serde::{Deserialize, Serialize};

/// Auxiliary UI controls whose visibility follows the selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Affordance {
    /// Hole info popup that follows the pointer.
    Tooltip,
    /// Stud file picker, available while a hole is locked.
    StudUpload,
    /// Diameter edit control, available while a hole is locked.
    DiameterEdit,
    /// Weld/fold choice, available while exactly two edges are locked.
    WeldFold,
}

impl Affordance {
    pub const ALL: [Affordance; 4] = [
        Affordance::Tooltip,
        Affordance::StudUpload,
        Affordance::DiameterEdit,
        Affordance::WeldFold,
    ];
}

/// How a locked pair of edges should be joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinMode {
    Weld,
    Fold,
}

/// Modifier keys held during a click. Ctrl on Linux/Windows and Cmd on
/// macOS both count as the multi-select modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            meta: false,
        }
    }

    pub fn multi_select(&self) -> bool {
        self.ctrl || self.meta
    }
}
