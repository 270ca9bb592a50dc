use serde::{Deserialize, Serialize};

use plate_geometry::{Point3d, Vec3};

/// A drilled hole as reported by the model loader, in native coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleRecord {
    pub position: Point3d,
    /// Diameter in millimetres.
    pub diameter: f64,
    /// Drill direction. May arrive unnormalized.
    pub axis: Vec3,
}

/// A straight plate edge as reported by the model loader, in native coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub start: Point3d,
    pub end: Point3d,
}
