//! Local coordinate frames.
//!
//! Every shape and the camera own a [`Frame`]: a scale, an Euler rotation and
//! a translation, plus the pair of mutually inverse matrices derived from
//! them. The matrices are only recomputed by an explicit [`Frame::lock`];
//! mutating the public fields without locking leaves them stale.

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::Ray;

/// Determinant magnitude below which a frame matrix is treated as singular.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Errors raised while locking a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Matrix is singular, cannot find inverse (scale {scale:?})")]
    SingularMatrix { scale: Vec3 },
}

/// A local coordinate system and its world-space transform pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Per-axis scale
    pub scale: Vec3,
    /// Euler angles in radians: x = roll (about X), y = pitch (about Y), z = yaw (about Z)
    pub rotation: Vec3,
    /// Translation
    pub origin: Vec3,

    frame_to_world: Mat4,
    world_to_frame: Mat4,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Identity frame (already locked).
    pub fn new() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            origin: Vec3::ZERO,
            frame_to_world: Mat4::IDENTITY,
            world_to_frame: Mat4::IDENTITY,
        }
    }

    /// Set the translation. Call [`Frame::lock`] afterwards.
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Set the scale. Call [`Frame::lock`] afterwards.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the Euler rotation. Call [`Frame::lock`] afterwards.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Recompute `frame_to_world = T(origin) * R(rotation) * S(scale)` and its inverse.
    ///
    /// On a singular matrix (a zero scale component) the previous matrices are kept
    /// and an error is returned.
    pub fn lock(&mut self) -> Result<(), FrameError> {
        let rotation = Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x);
        let frame_to_world =
            Mat4::from_translation(self.origin) * rotation * Mat4::from_scale(self.scale);

        if frame_to_world.determinant().abs() < SINGULAR_EPSILON {
            return Err(FrameError::SingularMatrix { scale: self.scale });
        }

        self.frame_to_world = frame_to_world;
        self.world_to_frame = frame_to_world.inverse();
        Ok(())
    }

    /// Consume, lock and return the frame.
    pub fn locked(mut self) -> Result<Self, FrameError> {
        self.lock()?;
        Ok(self)
    }

    /// Local → world matrix.
    pub fn frame_to_world(&self) -> Mat4 {
        self.frame_to_world
    }

    /// World → local matrix.
    pub fn world_to_frame(&self) -> Mat4 {
        self.world_to_frame
    }

    /// Transform a local point into world space.
    #[inline]
    pub fn point_to_world(&self, p: Vec3) -> Vec3 {
        self.frame_to_world.transform_point3(p)
    }

    /// Transform a local direction into world space (translation ignored).
    #[inline]
    pub fn direction_to_world(&self, d: Vec3) -> Vec3 {
        self.frame_to_world.transform_vector3(d)
    }

    /// Transform a world point into local space.
    #[inline]
    pub fn point_to_frame(&self, p: Vec3) -> Vec3 {
        self.world_to_frame.transform_point3(p)
    }

    /// Transform a world direction into local space (translation ignored).
    #[inline]
    pub fn direction_to_frame(&self, d: Vec3) -> Vec3 {
        self.world_to_frame.transform_vector3(d)
    }

    /// Transform a local normal into world space with the inverse-transpose rule.
    ///
    /// The result is not normalized.
    #[inline]
    pub fn normal_to_world(&self, n: Vec3) -> Vec3 {
        self.world_to_frame.transpose().transform_vector3(n)
    }

    /// Bring a world-space ray into this frame. The local direction is re-normalized.
    pub fn ray_to_frame(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.point_to_frame(ray.origin),
            self.direction_to_frame(ray.direction),
        )
    }
}
