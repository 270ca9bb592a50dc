//! Small geometry vocabulary shared by the picking core: points, vectors,
//! rays, segments, rotations, bounding boxes, and the native/render display
//! scale.

pub mod bounds;
pub mod point;
pub mod ray;
pub mod rotation;
pub mod scale;
pub mod vector;

pub use bounds::BoundingBox;
pub use point::Point3d;
pub use ray::{Ray, Segment};
pub use rotation::Rotation;
pub use scale::DisplayScale;
pub use vector::Vec3;

/// Errors raised when geometric input cannot produce a finite result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{what} has zero length")]
    ZeroLength { what: &'static str },

    #[error("{what} is not finite")]
    NonFinite { what: &'static str },

    #[error("display scale {axis} component must be finite and non-zero, got {value}")]
    InvalidScale { axis: char, value: f64 },
}
