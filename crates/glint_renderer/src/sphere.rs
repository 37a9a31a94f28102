//! Sphere primitive.

use crate::hittable::LocalHit;
use glint_math::{Ray, Vec3};

/// A sphere in its shape's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Closest intersection in front of the ray origin.
    ///
    /// When the origin is inside the sphere this is the exit point.
    pub fn intersect(&self, ray: &Ray) -> Option<LocalHit> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in front of the origin
        let mut root = (h - sqrtd) / a;
        if root <= 0.0 {
            root = (h + sqrtd) / a;
            if root <= 0.0 {
                return None;
            }
        }

        let point = ray.at(root);
        Some(LocalHit {
            t: root,
            point,
            normal: (point - self.center) / self.radius,
        })
    }
}
