//! Pointer → pick ray mapping.
//!
//! The pointer arrives in client pixels; the viewport rectangle locates the
//! canvas in the same pixel space. The result is a ray in render space, the
//! space the plate mesh is drawn in.

use nalgebra::{Isometry3, Orthographic3, Perspective3, Point3, Vector3};
use serde::{Deserialize, Serialize};

use plate_geometry::{Point3d, Ray, Vec3};

use crate::types::PickError;

/// Pointer position in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas rectangle in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Normalized device coordinates of `pointer`: x and y in [-1, 1] across
    /// the viewport, y pointing up.
    pub fn to_ndc(&self, pointer: &PointerPosition) -> Result<(f64, f64), PickError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) || !self.left.is_finite() || !self.top.is_finite() {
            return Err(PickError::DegenerateViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            return Err(PickError::InvalidPointer);
        }
        let x = ((pointer.x - self.left) / self.width) * 2.0 - 1.0;
        let y = -((pointer.y - self.top) / self.height) * 2.0 + 1.0;
        Ok((x, y))
    }
}

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub eye: Point3d,
    pub target: Point3d,
    pub up: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub frame: CameraFrame,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthographicCamera {
    pub frame: CameraFrame,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub near: f64,
    pub far: f64,
}

/// The active viewer camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Camera {
    Perspective(PerspectiveCamera),
    Orthographic(OrthographicCamera),
}

fn invalid(reason: impl Into<String>) -> PickError {
    PickError::InvalidCamera {
        reason: reason.into(),
    }
}

fn to_na(p: &Point3d) -> Point3<f64> {
    Point3::new(p.x, p.y, p.z)
}

impl CameraFrame {
    /// Camera-to-world transform, after checking the frame is well formed.
    fn camera_to_world(&self) -> Result<Isometry3<f64>, PickError> {
        if !self.eye.is_finite() || !self.target.is_finite() || !self.up.is_finite() {
            return Err(invalid("frame is not finite"));
        }
        let forward = (self.target - self.eye)
            .normalized()
            .ok_or_else(|| invalid("eye and target coincide"))?;
        if forward.cross(&self.up).length() < 1e-12 {
            return Err(invalid("up vector is parallel to the view direction"));
        }
        let up = Vector3::new(self.up.x, self.up.y, self.up.z);
        let view = Isometry3::look_at_rh(&to_na(&self.eye), &to_na(&self.target), &up);
        Ok(view.inverse())
    }
}

fn check_depth_range(near: f64, far: f64) -> Result<(), PickError> {
    if !near.is_finite() || !far.is_finite() || near >= far {
        return Err(invalid(format!("depth range {near}..{far} is empty")));
    }
    Ok(())
}

impl Camera {
    /// Cast a ray through normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc_x: f64, ndc_y: f64) -> Result<Ray, PickError> {
        match self {
            Camera::Perspective(cam) => {
                let fov_ok = cam.fov_y_degrees.is_finite()
                    && cam.fov_y_degrees > 0.0
                    && cam.fov_y_degrees < 180.0;
                if !fov_ok {
                    return Err(invalid(format!("field of view {} out of range", cam.fov_y_degrees)));
                }
                if !cam.aspect.is_finite() || cam.aspect <= 0.0 {
                    return Err(invalid(format!("aspect ratio {} must be positive", cam.aspect)));
                }
                if cam.near <= 0.0 {
                    return Err(invalid("perspective near plane must be positive"));
                }
                check_depth_range(cam.near, cam.far)?;
                let to_world = cam.frame.camera_to_world()?;

                let proj = Perspective3::new(cam.aspect, cam.fov_y_degrees.to_radians(), cam.near, cam.far);
                let on_frustum = to_world * proj.unproject_point(&Point3::new(ndc_x, ndc_y, 0.5));
                let dir = on_frustum - to_na(&cam.frame.eye);
                Ok(Ray::new(cam.frame.eye, Vec3::new(dir.x, dir.y, dir.z))?)
            }
            Camera::Orthographic(cam) => {
                if cam.left == cam.right || cam.top == cam.bottom {
                    return Err(invalid("orthographic frustum has zero width or height"));
                }
                check_depth_range(cam.near, cam.far)?;
                let to_world = cam.frame.camera_to_world()?;

                let proj = Orthographic3::new(cam.left, cam.right, cam.bottom, cam.top, cam.near, cam.far);
                let origin = to_world * proj.unproject_point(&Point3::new(ndc_x, ndc_y, -1.0));
                let dir = to_world * Vector3::new(0.0, 0.0, -1.0);
                Ok(Ray::new(
                    Point3d::new(origin.x, origin.y, origin.z),
                    Vec3::new(dir.x, dir.y, dir.z),
                )?)
            }
        }
    }
}

/// Map a pointer position to a pick ray in render space.
pub fn pointer_ray(
    pointer: &PointerPosition,
    viewport: &Viewport,
    camera: &Camera,
) -> Result<Ray, PickError> {
    let (x, y) = viewport.to_ndc(pointer)?;
    camera.ray_through_ndc(x, y)
}
