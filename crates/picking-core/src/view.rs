//! Render-facing description of the current selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use plate_geometry::{Point3d, Segment, Vec3};
use plate_types::{EdgeId, HoleId};

use crate::selection::SelectionPhase;

/// Marker drawn on the hovered or locked hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleMarker {
    pub hole: HoleId,
    pub center: Point3d,
    pub radius: f64,
}

/// A highlighted edge, already in render space, with the lift to apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeHighlight {
    pub edge: EdgeId,
    pub segment: Segment,
    pub offset: Vec3,
}

/// Draw state of one plate edge. Unhighlighted edges carry a zero offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRenderState {
    pub edge: EdgeId,
    pub segment: Segment,
    pub highlighted: bool,
    pub offset: Vec3,
}

/// Hover popup contents and where to put it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleTooltip {
    pub hole: HoleId,
    pub diameter: f64,
    pub position: Point3d,
    /// Client-pixel anchor for the popup's top-left corner.
    pub anchor: [f64; 2],
}

impl fmt::Display for HoleTooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hole Diameter: {:.2} mm\nPosition: ({:.2}, {:.2}, {:.2})",
            self.diameter, self.position.x, self.position.y, self.position.z
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionView {
    pub phase: SelectionPhase,
    pub hovered_hole: Option<HoleId>,
    pub hovered_edge: Option<EdgeId>,
    pub locked_hole: Option<HoleId>,
    pub locked_edges: Vec<EdgeId>,
    pub hole_marker: Option<HoleMarker>,
    pub edge_highlights: Vec<EdgeHighlight>,
    pub tooltip: Option<HoleTooltip>,
}
