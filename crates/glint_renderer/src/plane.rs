//! Infinite plane primitive.

use crate::hittable::LocalHit;
use glint_math::{Ray, Vec3};

/// Rays closer to parallel than this never hit the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<LocalHit> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t <= 0.0 {
            return None;
        }

        Some(LocalHit {
            t,
            point: ray.at(t),
            normal: self.normal,
        })
    }
}
