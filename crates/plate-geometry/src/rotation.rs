use serde::{Deserialize, Serialize};

use crate::vector::Vec3;
use crate::GeometryError;

/// A unit quaternion. Serialized as `{x, y, z, w}` to match what three.js
/// expects for `Object3D.quaternion`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Rotation {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Shortest-arc rotation taking direction `from` onto direction `to`.
    ///
    /// Neither input needs to be normalized. Opposite directions produce a
    /// half turn about an axis perpendicular to `from`.
    pub fn between(from: Vec3, to: Vec3) -> Result<Self, GeometryError> {
        let from = from
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "source axis" })?;
        let to = to
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "target axis" })?;

        let r = from.dot(&to) + 1.0;
        let (axis, w) = if r < 1e-12 {
            (from.any_perpendicular(), 0.0)
        } else {
            (from.cross(&to), r)
        };

        let len = (axis.length_squared() + w * w).sqrt();
        Ok(Self {
            x: axis.x / len,
            y: axis.y / len,
            z: axis.z / len,
            w: w / len,
        })
    }

    /// Rotate a vector by this quaternion.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(&v) * 2.0;
        v + t * self.w + q.cross(&t)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
