//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm to solve for the barycentric
//! coordinates of the hit point.

use crate::hittable::LocalHit;
use glint_math::{Aabb, Ray, Vec3};

/// Rays closer to parallel than this never hit the triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A triangle with a precomputed face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// Unit face normal, counter-clockwise winding
    pub normal: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self { v0, v1, v2, normal }
    }

    pub fn from_vertices([v0, v1, v2]: [Vec3; 3]) -> Self {
        Self::new(v0, v1, v2)
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Largest distance from the centroid to a vertex.
    pub fn bounding_radius(&self) -> f32 {
        let c = self.centroid();
        self.vertices()
            .iter()
            .map(|v| v.distance(c))
            .fold(0.0, f32::max)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_point_cloud(self.vertices())
    }

    /// Hit strictly inside the triangle and in front of the origin.
    pub fn intersect(&self, ray: &Ray) -> Option<LocalHit> {
        if ray.direction.dot(self.normal).abs() < PARALLEL_EPSILON {
            return None;
        }

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det == 0.0 {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if u <= 0.0 || u >= 1.0 {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v <= 0.0 || u + v >= 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t <= 0.0 {
            return None;
        }

        Some(LocalHit {
            t,
            point: self.v0 + u * edge1 + v * edge2,
            normal: self.normal,
        })
    }
}
