//! Intersection records and the closest-hit scan.

use crate::scene::MaterialId;
use crate::shape::Shape;
use glint_math::{Ray, Vec3};

/// Hit reported by a primitive in its own coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalHit {
    /// Distance along the (unit) local ray
    pub t: f32,
    pub point: Vec3,
    /// Outward geometric normal, not necessarily unit length
    pub normal: Vec3,
}

/// World-space record of a ray hitting a shape.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// Distance along the world ray
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Outward unit normal
    pub normal: Vec3,
    /// Whether the ray arrived against the outward normal
    pub front_face: bool,
    /// Material of the shape that was hit
    pub material: MaterialId,
    /// The ray that produced this hit
    pub incoming: Ray,
}

impl Intersection {
    pub fn new(t: f32, point: Vec3, normal: Vec3, material: MaterialId, incoming: Ray) -> Self {
        Self {
            t,
            point,
            normal,
            front_face: incoming.direction.dot(normal) < 0.0,
            material,
            incoming,
        }
    }

    /// The normal flipped, if needed, to point against the incoming ray.
    pub fn facing_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Linear scan for the nearest hit over a list of shapes.
pub fn closest_intersect(shapes: &[Shape], ray: &Ray) -> Option<Intersection> {
    let mut closest: Option<Intersection> = None;

    for shape in shapes {
        if let Some(hit) = shape.intersect(ray) {
            if closest.map_or(true, |c| hit.t < c.t) {
                closest = Some(hit);
            }
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MaterialId;

    #[test]
    fn test_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let outside = Intersection::new(4.0, Vec3::Z, Vec3::Z, MaterialId(0), ray);
        assert!(outside.front_face);
        assert_eq!(outside.facing_normal(), Vec3::Z);

        let inside = Intersection::new(4.0, Vec3::Z, Vec3::NEG_Z, MaterialId(0), ray);
        assert!(!inside.front_face);
        assert_eq!(inside.facing_normal(), Vec3::Z);
    }

    #[test]
    fn test_closest_intersect_picks_nearest() {
        let shapes = vec![
            Shape::sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, MaterialId(0)),
            Shape::sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, MaterialId(1)),
            Shape::sphere(Vec3::new(0.0, 5.0, -2.0), 1.0, MaterialId(2)),
        ];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = closest_intersect(&shapes, &ray).unwrap();
        assert_eq!(hit.material, MaterialId(1));
        assert!((hit.t - 3.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(closest_intersect(&shapes, &miss).is_none());
        assert!(closest_intersect(&[], &ray).is_none());
    }
}
