//! JSON message bridge between the viewer page and the picking session.

pub mod bridge_state;
pub mod dispatch;
pub mod messages;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use bridge_state::{BridgeError, BridgeState};
pub use dispatch::{dispatch, process_json};
pub use messages::{UiToViewer, ViewerToUi};
