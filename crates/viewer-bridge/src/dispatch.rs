use tracing::{debug, warn};

use picking_core::{EditOutcome, LoadOutcome, LoadTicket};

use crate::bridge_state::{BridgeError, BridgeState};
use crate::messages::{UiToViewer, ViewerToUi};

/// Dispatch a page message to the session and return the response.
///
/// Failures never escape: they come back as [`ViewerToUi::Error`] so the page
/// always gets exactly one reply per message.
pub fn dispatch(state: &mut BridgeState, msg: UiToViewer) -> ViewerToUi {
    let kind = msg.kind();
    debug!(kind, "dispatching message");
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(e) => {
            warn!(kind, error = %e, "message failed");
            ViewerToUi::Error {
                message: e.to_string(),
            }
        }
    }
}

/// Parse a JSON message, dispatch it and serialize the reply.
pub fn process_json(state: &mut BridgeState, json_input: &str) -> String {
    let response = match parse_message(json_input) {
        Ok(msg) => dispatch(state, msg),
        Err(e) => ViewerToUi::Error {
            message: e.to_string(),
        },
    };
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"type":"Error","message":"Serialization failed: {}"}}"#,
            e
        )
    })
}

fn parse_message(json_input: &str) -> Result<UiToViewer, BridgeError> {
    serde_json::from_str(json_input).map_err(|e| BridgeError::Parse {
        reason: e.to_string(),
    })
}

fn handle_message(state: &mut BridgeState, msg: UiToViewer) -> Result<ViewerToUi, BridgeError> {
    match msg {
        UiToViewer::Configure { config } => {
            state.session.set_config(config)?;
            Ok(ViewerToUi::Configured { config })
        }

        // -- Model loading --
        UiToViewer::BeginModelLoad => {
            let ticket = state.session.begin_model_load();
            Ok(ViewerToUi::LoadStarted {
                generation: ticket.generation,
            })
        }

        UiToViewer::ModelLoaded { generation, model } => {
            let outcome = state
                .session
                .complete_model_load(LoadTicket { generation }, model, &mut state.ui)?;
            Ok(load_outcome_response(state, outcome))
        }

        UiToViewer::ModelLoadFailed { generation, reason } => {
            let outcome = state.session.fail_model_load(LoadTicket { generation }, reason);
            Ok(load_outcome_response(state, outcome))
        }

        // -- Pointer --
        UiToViewer::PickRay {
            pointer,
            viewport,
            camera,
        } => {
            let ray = picking_core::pointer_ray(&pointer, &viewport, &camera)?;
            Ok(ViewerToUi::RayComputed { ray })
        }

        UiToViewer::SurfaceHover { pointer, hit } => {
            state.session.hover_at(pointer, hit, &mut state.ui);
            Ok(state.selection_changed())
        }

        UiToViewer::Click { modifiers } => {
            state.session.click(modifiers, &mut state.ui);
            Ok(state.selection_changed())
        }

        // -- Hole operations --
        UiToViewer::EditDiameter { new_diameter } => {
            let ticket = state.session.begin_diameter_edit(new_diameter)?;
            Ok(ViewerToUi::EditRequested {
                ticket,
                view: state.view(),
            })
        }

        UiToViewer::DiameterEditSucceeded { request, mesh_url } => {
            let outcome = state.session.complete_diameter_edit(request, Ok(mesh_url));
            Ok(edit_outcome_response(state, outcome))
        }

        UiToViewer::DiameterEditFailed { request, reason } => {
            let outcome = state.session.complete_diameter_edit(request, Err(reason));
            Ok(edit_outcome_response(state, outcome))
        }

        UiToViewer::PlaceStud { extent } => Ok(ViewerToUi::StudPlaced {
            placement: state.session.place_stud(extent)?,
        }),

        UiToViewer::PlaceStudMesh { positions } => Ok(ViewerToUi::StudPlaced {
            placement: state.session.place_stud_from_vertices(&positions)?,
        }),

        // -- Edge operations --
        UiToViewer::ChooseJoin { mode } => Ok(ViewerToUi::JoinRequested {
            request: state.session.request_join(mode)?,
        }),

        // -- Queries --
        UiToViewer::GetSelection => Ok(state.selection_changed()),

        UiToViewer::GetCatalog => Ok(ViewerToUi::Catalog {
            groups: state.session.catalog(),
        }),

        UiToViewer::GetEdges => Ok(ViewerToUi::Edges {
            edges: state.session.edge_render_states(),
        }),
    }
}

fn load_outcome_response(state: &BridgeState, outcome: LoadOutcome) -> ViewerToUi {
    match outcome {
        LoadOutcome::Installed {
            generation,
            holes,
            edges,
        } => ViewerToUi::ModelInstalled {
            generation,
            mesh_url: state.session.mesh_url().unwrap_or_default().to_string(),
            holes,
            edges,
        },
        LoadOutcome::Failed { generation, reason } => ViewerToUi::ModelLoadFailed { generation, reason },
        LoadOutcome::Stale { generation, latest } => ViewerToUi::Ignored {
            reason: format!("load {generation} superseded by {latest}"),
        },
    }
}

fn edit_outcome_response(state: &BridgeState, outcome: EditOutcome) -> ViewerToUi {
    match outcome {
        EditOutcome::Applied {
            hole,
            diameter,
            mesh_url,
        } => ViewerToUi::EditApplied {
            hole,
            diameter,
            mesh_url,
            view: state.view(),
        },
        EditOutcome::Failed {
            hole,
            restored_diameter,
            reason,
        } => ViewerToUi::EditFailed {
            hole,
            restored_diameter,
            reason,
            view: state.view(),
        },
        EditOutcome::Stale => ViewerToUi::Ignored {
            reason: "diameter edit superseded".to_string(),
        },
    }
}
