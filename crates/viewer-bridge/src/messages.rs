use serde::{Deserialize, Serialize};

use picking_core::{
    Camera, DiameterGroup, EdgeRenderState, EditTicket, JoinRequest, LoadedModel, PickingConfig, PointerPosition,
    SelectionView, StudPlacement, Viewport, VisibilityChange,
};
use plate_geometry::{Point3d, Ray};
use plate_types::{Affordance, HoleId, JoinMode, ModelGeneration, Modifiers, RequestId};

/// Messages from the page to the picking session.
/// Serialized as JSON for postMessage transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToViewer {
    /// Replace tolerances and highlight parameters.
    Configure { config: PickingConfig },

    // -- Model loading --
    /// A new model fetch is about to start.
    BeginModelLoad,
    /// The fetch for `generation` finished.
    ModelLoaded {
        generation: ModelGeneration,
        model: LoadedModel,
    },
    ModelLoadFailed {
        generation: ModelGeneration,
        reason: String,
    },

    // -- Pointer --
    /// Ask for the pick ray under the pointer.
    PickRay {
        pointer: PointerPosition,
        viewport: Viewport,
        camera: Camera,
    },
    /// The renderer intersected the pick ray with the plate (or missed).
    SurfaceHover {
        pointer: PointerPosition,
        hit: Option<Point3d>,
    },
    Click {
        #[serde(default)]
        modifiers: Modifiers,
    },

    // -- Hole operations --
    EditDiameter { new_diameter: f64 },
    DiameterEditSucceeded { request: RequestId, mesh_url: String },
    DiameterEditFailed { request: RequestId, reason: String },
    /// Stud width already measured by the page.
    PlaceStud { extent: f64 },
    /// Stud vertex buffer, `[x0, y0, z0, x1, ...]`.
    PlaceStudMesh { positions: Vec<f32> },

    // -- Edge operations --
    ChooseJoin { mode: JoinMode },

    // -- Queries --
    GetSelection,
    GetCatalog,
    GetEdges,
}

impl UiToViewer {
    /// Variant name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            UiToViewer::Configure { .. } => "Configure",
            UiToViewer::BeginModelLoad => "BeginModelLoad",
            UiToViewer::ModelLoaded { .. } => "ModelLoaded",
            UiToViewer::ModelLoadFailed { .. } => "ModelLoadFailed",
            UiToViewer::PickRay { .. } => "PickRay",
            UiToViewer::SurfaceHover { .. } => "SurfaceHover",
            UiToViewer::Click { .. } => "Click",
            UiToViewer::EditDiameter { .. } => "EditDiameter",
            UiToViewer::DiameterEditSucceeded { .. } => "DiameterEditSucceeded",
            UiToViewer::DiameterEditFailed { .. } => "DiameterEditFailed",
            UiToViewer::PlaceStud { .. } => "PlaceStud",
            UiToViewer::PlaceStudMesh { .. } => "PlaceStudMesh",
            UiToViewer::ChooseJoin { .. } => "ChooseJoin",
            UiToViewer::GetSelection => "GetSelection",
            UiToViewer::GetCatalog => "GetCatalog",
            UiToViewer::GetEdges => "GetEdges",
        }
    }
}

/// Messages from the picking session back to the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewerToUi {
    Configured { config: PickingConfig },

    /// Start the fetch and echo `generation` back with the result.
    LoadStarted { generation: ModelGeneration },
    ModelInstalled {
        generation: ModelGeneration,
        mesh_url: String,
        holes: usize,
        edges: usize,
    },
    ModelLoadFailed {
        generation: ModelGeneration,
        reason: String,
    },

    RayComputed { ray: Ray },

    /// What to draw and which controls to show after a hover, click or
    /// query.
    SelectionChanged {
        view: SelectionView,
        visible: Vec<Affordance>,
        changes: Vec<VisibilityChange>,
    },

    /// Send the edit to the backend and echo `ticket.request` back.
    EditRequested {
        ticket: EditTicket,
        view: SelectionView,
    },
    EditApplied {
        hole: HoleId,
        diameter: f64,
        mesh_url: String,
        view: SelectionView,
    },
    EditFailed {
        hole: HoleId,
        restored_diameter: f64,
        reason: String,
        view: SelectionView,
    },

    StudPlaced { placement: StudPlacement },
    JoinRequested { request: JoinRequest },
    Catalog { groups: Vec<DiameterGroup> },
    Edges { edges: Vec<EdgeRenderState> },

    /// A late response that no longer applies.
    Ignored { reason: String },

    Error { message: String },
}
