use serde::{Deserialize, Serialize};

use crate::point::Point3d;
use crate::ray::Segment;
use crate::vector::Vec3;
use crate::GeometryError;

/// Per-axis multiplier taking native (feature data) coordinates to render
/// coordinates. Every component is finite and non-zero, so the mapping is
/// always invertible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec3", into = "Vec3")]
pub struct DisplayScale {
    factors: Vec3,
}

impl DisplayScale {
    pub const IDENTITY: Self = Self {
        factors: Vec3 {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        },
    };

    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, GeometryError> {
        for (axis, value) in [('x', x), ('y', y), ('z', z)] {
            if !value.is_finite() || value.abs() < 1e-12 {
                return Err(GeometryError::InvalidScale { axis, value });
            }
        }
        Ok(Self {
            factors: Vec3::new(x, y, z),
        })
    }

    pub fn uniform(s: f64) -> Result<Self, GeometryError> {
        Self::new(s, s, s)
    }

    pub fn factors(&self) -> Vec3 {
        self.factors
    }

    pub fn x(&self) -> f64 {
        self.factors.x
    }

    pub fn to_native(&self, render: &Point3d) -> Point3d {
        Point3d::new(
            render.x / self.factors.x,
            render.y / self.factors.y,
            render.z / self.factors.z,
        )
    }

    pub fn to_render(&self, native: &Point3d) -> Point3d {
        Point3d::new(
            native.x * self.factors.x,
            native.y * self.factors.y,
            native.z * self.factors.z,
        )
    }

    pub fn segment_to_render(&self, native: &Segment) -> Segment {
        Segment::new(self.to_render(&native.start), self.to_render(&native.end))
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<Vec3> for DisplayScale {
    type Error = GeometryError;
    fn try_from(v: Vec3) -> Result<Self, Self::Error> {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<DisplayScale> for Vec3 {
    fn from(s: DisplayScale) -> Self {
        s.factors
    }
}
