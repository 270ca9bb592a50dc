//! Proximity matching of a surface hit against holes and edges.
//!
//! Holes are compared in native space: the hit is divided by the display
//! scale and the hole tolerance is in native units. Edges are compared in
//! render space: their native endpoints are multiplied by the display scale
//! and the edge tolerance is in render units. Both matchers return the
//! globally closest candidate, first in enumeration order on ties.

use serde::{Deserialize, Serialize};
use tracing::trace;

use plate_geometry::Point3d;
use plate_types::{EdgeId, HoleId};

use crate::config::PickingConfig;
use crate::features::{FeatureSnapshot, Hole};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleMatch {
    pub id: HoleId,
    /// Centre distance minus radius. Negative when the hit is inside the rim.
    pub effective_distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeMatch {
    pub id: EdgeId,
    /// Render-space distance from the hit to the segment.
    pub distance: f64,
}

/// Best hole and best edge for one hit point, found independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub hole: Option<HoleMatch>,
    pub edge: Option<EdgeMatch>,
}

/// Distance from a native-space point to the hole centre, minus the radius.
pub fn effective_distance(hole: &Hole, native_point: &Point3d) -> f64 {
    native_point.distance_to(&hole.position) - hole.radius()
}

/// Hole whose rim is closest to `render_point`, among holes with effective
/// distance below `tolerance`.
pub fn nearest_hole(
    snapshot: &FeatureSnapshot,
    render_point: &Point3d,
    tolerance: f64,
) -> Option<HoleMatch> {
    let native = snapshot.scale().to_native(render_point);
    let mut best: Option<HoleMatch> = None;
    for hole in snapshot.holes() {
        let effective = effective_distance(hole, &native);
        if effective >= tolerance || effective.is_nan() {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => effective.abs() < b.effective_distance.abs(),
        };
        if better {
            best = Some(HoleMatch {
                id: hole.id,
                effective_distance: effective,
            });
        }
    }
    best
}

/// Edge closest to `render_point`, among edges closer than `tolerance`.
pub fn nearest_edge(
    snapshot: &FeatureSnapshot,
    render_point: &Point3d,
    tolerance: f64,
) -> Option<EdgeMatch> {
    let mut best: Option<EdgeMatch> = None;
    for edge in snapshot.edges() {
        let distance = snapshot
            .edge_in_render_space(edge)
            .distance_to_point(render_point);
        if distance >= tolerance || distance.is_nan() {
            continue;
        }
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(EdgeMatch {
                id: edge.id,
                distance,
            });
        }
    }
    best
}

/// Match a render-space hit against every hole and edge of the snapshot.
pub fn resolve(snapshot: &FeatureSnapshot, render_point: &Point3d, config: &PickingConfig) -> Resolution {
    let resolution = Resolution {
        hole: nearest_hole(snapshot, render_point, config.hole_tolerance),
        edge: nearest_edge(snapshot, render_point, config.edge_tolerance),
    };
    trace!(point = ?render_point.to_array(), ?resolution, "resolved hit");
    resolution
}
