use picking_core::{LoadedModel, PointerPosition};
use plate_geometry::{DisplayScale, Point3d, Vec3};
use plate_types::*;
use serde_json::{json, Value};
use viewer_bridge::*;

// ── Helper functions ─────────────────────────────────────────────────────

fn plate_model() -> LoadedModel {
    LoadedModel {
        mesh_url: "/models/plate.glb".into(),
        display_scale: DisplayScale::uniform(0.1).unwrap(),
        holes: vec![HoleRecord {
            position: Point3d::new(5.0, 0.0, 0.0),
            diameter: 4.0,
            axis: Vec3::Z,
        }],
        edges: vec![
            EdgeRecord {
                start: Point3d::new(0.0, 100.0, 0.0),
                end: Point3d::new(100.0, 100.0, 0.0),
            },
            EdgeRecord {
                start: Point3d::new(0.0, 200.0, 0.0),
                end: Point3d::new(100.0, 200.0, 0.0),
            },
        ],
    }
}

fn loaded_state() -> BridgeState {
    let mut state = BridgeState::new();
    let ViewerToUi::LoadStarted { generation } = dispatch(&mut state, UiToViewer::BeginModelLoad) else {
        panic!("expected LoadStarted");
    };
    let response = dispatch(
        &mut state,
        UiToViewer::ModelLoaded {
            generation,
            model: plate_model(),
        },
    );
    assert!(matches!(response, ViewerToUi::ModelInstalled { holes: 1, edges: 2, .. }));
    state
}

fn hover(state: &mut BridgeState, x: f64, y: f64) -> ViewerToUi {
    dispatch(
        state,
        UiToViewer::SurfaceHover {
            pointer: PointerPosition::new(200.0, 100.0),
            hit: Some(Point3d::new(x, y, 0.0)),
        },
    )
}

fn click(state: &mut BridgeState, modifiers: Modifiers) -> ViewerToUi {
    dispatch(state, UiToViewer::Click { modifiers })
}

fn send(state: &mut BridgeState, msg: Value) -> Value {
    serde_json::from_str(&process_json(state, &msg.to_string())).unwrap()
}

// ── Wire format ──────────────────────────────────────────────────────────

#[test]
fn test_json_load_and_hover() {
    let mut state = BridgeState::new();
    let started = send(&mut state, json!({"type": "BeginModelLoad"}));
    assert_eq!(started, json!({"type": "LoadStarted", "generation": 1}));

    let installed = send(
        &mut state,
        json!({
            "type": "ModelLoaded",
            "generation": 1,
            "model": {
                "mesh_url": "/models/plate.glb",
                "display_scale": {"x": 0.1, "y": 0.1, "z": 0.1},
                "holes": [{
                    "position": {"x": 5.0, "y": 0.0, "z": 0.0},
                    "diameter": 4.0,
                    "axis": {"x": 0.0, "y": 0.0, "z": 1.0}
                }],
                "edges": []
            }
        }),
    );
    assert_eq!(installed["type"], "ModelInstalled");
    assert_eq!(installed["holes"], 1);
    assert_eq!(installed["mesh_url"], "/models/plate.glb");

    let hovered = send(
        &mut state,
        json!({
            "type": "SurfaceHover",
            "pointer": {"x": 10.0, "y": 20.0},
            "hit": {"x": 0.5, "y": 0.0, "z": 0.0}
        }),
    );
    assert_eq!(hovered["type"], "SelectionChanged");
    assert_eq!(hovered["view"]["hovered_hole"], 0);
    assert_eq!(hovered["view"]["phase"], json!({"hole": "HoverOnly", "edges_locked": 0}));
    assert_eq!(hovered["view"]["tooltip"]["anchor"], json!([25.0, 35.0]));
    assert_eq!(hovered["visible"], json!(["Tooltip"]));
}

#[test]
fn test_click_modifiers_default_to_none() {
    let mut state = loaded_state();
    hover(&mut state, 5.0, 10.05);
    let reply = send(&mut state, json!({"type": "Click"}));
    assert_eq!(reply["view"]["locked_edges"], json!([0]));
}

#[test]
fn test_malformed_json_returns_error() {
    let mut state = BridgeState::new();
    let reply = send(&mut state, json!({"type": "NoSuchMessage"}));
    assert_eq!(reply["type"], "Error");
    assert!(reply["message"]
        .as_str()
        .unwrap()
        .starts_with("failed to parse message"));

    let raw = process_json(&mut state, "not json");
    assert!(raw.contains("\"type\":\"Error\""));
}

#[test]
fn test_zero_scale_rejected_at_parse() {
    let mut state = BridgeState::new();
    let reply = send(
        &mut state,
        json!({
            "type": "ModelLoaded",
            "generation": 1,
            "model": {
                "mesh_url": "m",
                "display_scale": {"x": 0.0, "y": 1.0, "z": 1.0},
                "holes": [],
                "edges": []
            }
        }),
    );
    assert_eq!(reply["type"], "Error");
}

#[test]
fn test_pick_ray_json() {
    let mut state = BridgeState::new();
    let reply = send(
        &mut state,
        json!({
            "type": "PickRay",
            "pointer": {"x": 400.0, "y": 300.0},
            "viewport": {"left": 0.0, "top": 0.0, "width": 800.0, "height": 600.0},
            "camera": {
                "type": "Perspective",
                "frame": {
                    "eye": {"x": 0.0, "y": 0.0, "z": 20.0},
                    "target": {"x": 0.0, "y": 0.0, "z": 0.0},
                    "up": {"x": 0.0, "y": 1.0, "z": 0.0}
                },
                "fov_y_degrees": 50.0,
                "aspect": 1.333,
                "near": 0.1,
                "far": 500.0
            }
        }),
    );
    assert_eq!(reply["type"], "RayComputed");
    let dz = reply["ray"]["direction"]["z"].as_f64().unwrap();
    assert!((dz + 1.0).abs() < 1e-9);
}

// ── Flows ────────────────────────────────────────────────────────────────

#[test]
fn test_stale_load_is_ignored() {
    let mut state = BridgeState::new();
    dispatch(&mut state, UiToViewer::BeginModelLoad);
    dispatch(&mut state, UiToViewer::BeginModelLoad);

    let reply = dispatch(
        &mut state,
        UiToViewer::ModelLoaded {
            generation: ModelGeneration(1),
            model: plate_model(),
        },
    );
    assert!(matches!(reply, ViewerToUi::Ignored { .. }));
    assert!(state.session.index().current().is_none());

    let reply = dispatch(
        &mut state,
        UiToViewer::ModelLoadFailed {
            generation: ModelGeneration(2),
            reason: "404".into(),
        },
    );
    assert!(matches!(reply, ViewerToUi::ModelLoadFailed { .. }));
}

#[test]
fn test_lock_hole_and_place_stud() {
    let mut state = loaded_state();
    hover(&mut state, 0.5, 0.0);
    let ViewerToUi::SelectionChanged { view, visible, changes } = click(&mut state, Modifiers::NONE) else {
        panic!("expected SelectionChanged");
    };
    assert_eq!(view.locked_hole, Some(HoleId(0)));
    assert!(visible.contains(&Affordance::StudUpload));
    assert!(visible.contains(&Affordance::DiameterEdit));
    assert!(changes.iter().any(|c| c.kind == Affordance::StudUpload && c.visible));

    let ViewerToUi::StudPlaced { placement } = dispatch(&mut state, UiToViewer::PlaceStud { extent: 2.0 }) else {
        panic!("expected StudPlaced");
    };
    assert!((placement.scale - 0.2).abs() < 1e-12);

    let reply = dispatch(&mut state, UiToViewer::PlaceStud { extent: 0.0 });
    assert!(matches!(reply, ViewerToUi::Error { .. }));
}

#[test]
fn test_two_edges_then_weld() {
    let mut state = loaded_state();
    hover(&mut state, 5.0, 10.05);
    click(&mut state, Modifiers::ctrl());
    hover(&mut state, 5.0, 20.05);
    let ViewerToUi::SelectionChanged { view, visible, .. } = click(&mut state, Modifiers::ctrl()) else {
        panic!("expected SelectionChanged");
    };
    assert_eq!(view.locked_edges, vec![EdgeId(0), EdgeId(1)]);
    assert!(visible.contains(&Affordance::WeldFold));

    let edges = send(&mut state, json!({"type": "GetEdges"}));
    assert_eq!(edges["edges"][1]["highlighted"], true);
    assert_eq!(edges["edges"][1]["segment"]["start"]["y"], 20.0);

    let ViewerToUi::JoinRequested { request } = dispatch(&mut state, UiToViewer::ChooseJoin { mode: JoinMode::Fold }) else {
        panic!("expected JoinRequested");
    };
    assert_eq!(request.mode, JoinMode::Fold);
    assert_eq!((request.first, request.second), (EdgeId(0), EdgeId(1)));
}

#[test]
fn test_join_without_two_edges_is_error() {
    let mut state = loaded_state();
    let reply = dispatch(&mut state, UiToViewer::ChooseJoin { mode: JoinMode::Weld });
    let ViewerToUi::Error { message } = reply else {
        panic!("expected Error");
    };
    assert!(message.contains('0'));
}

#[test]
fn test_diameter_edit_round_trip() {
    let mut state = loaded_state();
    hover(&mut state, 0.5, 0.0);
    click(&mut state, Modifiers::NONE);

    let ViewerToUi::EditRequested { ticket, view } = dispatch(&mut state, UiToViewer::EditDiameter { new_diameter: 6.0 }) else {
        panic!("expected EditRequested");
    };
    assert!((view.hole_marker.unwrap().radius - 0.3).abs() < 1e-12);

    let reply = dispatch(
        &mut state,
        UiToViewer::DiameterEditSucceeded {
            request: ticket.request,
            mesh_url: "/models/plate-v2.glb".into(),
        },
    );
    let ViewerToUi::EditApplied { hole, diameter, view, .. } = reply else {
        panic!("expected EditApplied, got {reply:?}");
    };
    assert_eq!(hole, HoleId(0));
    assert_eq!(diameter, 6.0);
    assert!((view.hole_marker.unwrap().radius - 0.3).abs() < 1e-12);

    let ViewerToUi::Catalog { groups } = dispatch(&mut state, UiToViewer::GetCatalog) else {
        panic!("expected Catalog");
    };
    assert_eq!(groups[0].nominal_mm, 6);

    let late = dispatch(
        &mut state,
        UiToViewer::DiameterEditFailed {
            request: ticket.request,
            reason: "timeout".into(),
        },
    );
    assert!(matches!(late, ViewerToUi::Ignored { .. }));
}

#[test]
fn test_failed_edit_reports_restored_diameter() {
    let mut state = loaded_state();
    hover(&mut state, 0.5, 0.0);
    click(&mut state, Modifiers::NONE);
    let ViewerToUi::EditRequested { ticket, .. } = dispatch(&mut state, UiToViewer::EditDiameter { new_diameter: 9.0 }) else {
        panic!("expected EditRequested");
    };
    let reply = dispatch(
        &mut state,
        UiToViewer::DiameterEditFailed {
            request: ticket.request,
            reason: "backend down".into(),
        },
    );
    assert!(matches!(
        reply,
        ViewerToUi::EditFailed { restored_diameter, .. } if restored_diameter == 4.0
    ));
}

#[test]
fn test_messages_on_empty_session() {
    let mut state = BridgeState::new();
    let reply = hover(&mut state, 0.5, 0.0);
    let ViewerToUi::SelectionChanged { view, visible, .. } = reply else {
        panic!("expected SelectionChanged");
    };
    assert!(view.hovered_hole.is_none());
    assert!(visible.is_empty());
    assert!(matches!(click(&mut state, Modifiers::NONE), ViewerToUi::SelectionChanged { .. }));
    assert!(matches!(
        dispatch(&mut state, UiToViewer::EditDiameter { new_diameter: 3.0 }),
        ViewerToUi::Error { .. }
    ));
}

#[test]
fn test_configure_validates() {
    let mut state = BridgeState::new();
    let reply = send(
        &mut state,
        json!({"type": "Configure", "config": {"hole_tolerance": 2.5}}),
    );
    assert_eq!(reply["type"], "Configured");
    assert_eq!(reply["config"]["hole_tolerance"], 2.5);
    assert_eq!(reply["config"]["edge_tolerance"], 0.1);
    assert_eq!(state.session.config().hole_tolerance, 2.5);

    let reply = send(
        &mut state,
        json!({"type": "Configure", "config": {"edge_tolerance": -1.0}}),
    );
    assert_eq!(reply["type"], "Error");
}
