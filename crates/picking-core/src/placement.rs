//! Fitting a stud shape into a hole.

use serde::{Deserialize, Serialize};

use plate_geometry::{BoundingBox, DisplayScale, Point3d, Rotation, Vec3};
use plate_types::HoleId;

use crate::features::Hole;
use crate::types::PickError;

/// Axis a stud model is drawn along before placement.
pub const STUD_DEFAULT_AXIS: Vec3 = Vec3::Z;

/// Where and how to draw a stud so that it sits in a hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudPlacement {
    pub hole: HoleId,
    /// Uniform scale for all three axes of the stud mesh.
    pub scale: f64,
    /// Render-space position of the hole centre.
    pub position: Point3d,
    /// Rotation taking [`STUD_DEFAULT_AXIS`] onto the hole axis.
    pub rotation: Rotation,
}

/// Width of a stud mesh across X, measured from its flat vertex buffer.
pub fn stud_extent(positions: &[f32]) -> Result<f64, PickError> {
    let bounds = BoundingBox::from_flat_positions(positions);
    if !bounds.is_valid() {
        return Err(PickError::EmptyShape);
    }
    Ok(bounds.size().x)
}

/// Scale, position and orient a stud of width `shape_extent` (stud units,
/// measured across X) so it fills `hole`.
pub fn place_stud(
    hole: &Hole,
    shape_extent: f64,
    display: &DisplayScale,
    min_extent: f64,
) -> Result<StudPlacement, PickError> {
    if !shape_extent.is_finite() || shape_extent < min_extent {
        return Err(PickError::DegenerateShape {
            extent: shape_extent,
        });
    }
    let rotation = Rotation::between(STUD_DEFAULT_AXIS, hole.axis)?;
    Ok(StudPlacement {
        hole: hole.id,
        scale: (hole.diameter / shape_extent) * display.x(),
        position: display.to_render(&hole.position),
        rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(axis: Vec3) -> Hole {
        Hole {
            id: HoleId(3),
            position: Point3d::new(5.0, 10.0, 0.0),
            diameter: 4.0,
            axis,
        }
    }

    #[test]
    fn test_scale_and_position() {
        let display = DisplayScale::uniform(0.1).unwrap();
        let p = place_stud(&hole(Vec3::Z), 2.0, &display, 1e-9).unwrap();
        assert!((p.scale - 0.2).abs() < 1e-12);
        assert!((p.position.x - 0.5).abs() < 1e-12);
        assert!((p.position.y - 1.0).abs() < 1e-12);
        assert_eq!(p.hole, HoleId(3));
    }

    #[test]
    fn test_rotation_aligns_with_hole_axis() {
        let display = DisplayScale::IDENTITY;
        let p = place_stud(&hole(Vec3::new(0.0, 3.0, 0.0)), 1.0, &display, 1e-9).unwrap();
        let aligned = p.rotation.rotate(STUD_DEFAULT_AXIS);
        assert!((aligned - Vec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_zero_extent_rejected() {
        let display = DisplayScale::IDENTITY;
        for extent in [0.0, -1.0, 1e-12, f64::NAN, f64::INFINITY] {
            let err = place_stud(&hole(Vec3::Z), extent, &display, 1e-9).unwrap_err();
            assert!(matches!(err, PickError::DegenerateShape { .. }), "{extent}");
        }
    }

    #[test]
    fn test_zero_axis_rejected() {
        let err = place_stud(&hole(Vec3::ZERO), 1.0, &DisplayScale::IDENTITY, 1e-9).unwrap_err();
        assert!(matches!(err, PickError::Geometry(_)));
    }

    #[test]
    fn test_stud_extent_from_vertices() {
        let extent = stud_extent(&[-1.5, 0.0, 0.0, 1.5, 2.0, 9.0]).unwrap();
        assert!((extent - 3.0).abs() < 1e-6);
        assert!(matches!(stud_extent(&[]), Err(PickError::EmptyShape)));
    }
}
