use serde::{Deserialize, Serialize};

use crate::point::Point3d;
use crate::vector::Vec3;
use crate::GeometryError;

/// A half-line used for picking. The direction is always unit length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3d,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`.
    pub fn new(origin: Point3d, direction: Vec3) -> Result<Self, GeometryError> {
        if !origin.is_finite() {
            return Err(GeometryError::NonFinite { what: "ray origin" });
        }
        let direction = direction
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "ray direction" })?;
        Ok(Self { origin, direction })
    }

    pub fn at(&self, t: f64) -> Point3d {
        self.origin + self.direction * t
    }
}

/// A bounded line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point3d,
    pub end: Point3d,
}

impl Segment {
    pub fn new(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }

    pub fn is_degenerate(&self) -> bool {
        (self.end - self.start).length_squared() == 0.0
    }

    /// Closest point on the segment to `p` and its clamped parameter in [0, 1].
    pub fn closest_point(&self, p: &Point3d) -> (Point3d, f64) {
        if self.is_degenerate() {
            return (self.start, 0.0);
        }
        let d = self.end - self.start;
        let t = (d.dot(&(*p - self.start)) / d.length_squared()).clamp(0.0, 1.0);
        (self.start + d * t, t)
    }

    /// Euclidean distance from `p` to the nearest point of the segment.
    /// A degenerate segment measures plain point-to-point distance.
    pub fn distance_to_point(&self, p: &Point3d) -> f64 {
        let (closest, _) = self.closest_point(p);
        p.distance_to(&closest)
    }
}
