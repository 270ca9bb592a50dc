//! WASM entry points for the page.
//!
//! This module is only compiled for the `wasm32` target. The page calls
//! `init` once, then passes every event through `process_message`.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::bridge_state::BridgeState;
use crate::dispatch;

// Single-threaded on the page.
thread_local! {
    static BRIDGE_STATE: RefCell<Option<BridgeState>> = RefCell::new(None);
}

const NOT_INITIALIZED: &str = r#"{"type":"Error","message":"viewer not initialized, call init() first"}"#;

/// Set up the panic hook and a fresh session. Calling it again drops the
/// current session.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    BRIDGE_STATE.with(|cell| {
        *cell.borrow_mut() = Some(BridgeState::new());
    });
}

/// Process a JSON `UiToViewer` message and return a JSON `ViewerToUi` reply.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    BRIDGE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(state) => dispatch::process_json(state, json_input),
        None => NOT_INITIALIZED.to_string(),
    })
}

/// Current selection view as JSON, without draining visibility changes.
#[wasm_bindgen]
pub fn get_selection_view() -> String {
    BRIDGE_STATE.with(|cell| match cell.borrow().as_ref() {
        Some(state) => serde_json::to_string(&state.view()).unwrap_or_default(),
        None => NOT_INITIALIZED.to_string(),
    })
}
