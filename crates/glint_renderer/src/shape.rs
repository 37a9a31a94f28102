//! Shapes: a primitive, the frame that places it, and its material.

use crate::bvh::Bvh;
use crate::hittable::{Intersection, LocalHit};
use crate::plane::Plane;
use crate::scene::MaterialId;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use glint_core::TriangleMesh;
use glint_math::{Frame, Ray, Vec3};

/// Default split depth for mesh BVHs.
pub const DEFAULT_MESH_DEPTH: usize = 12;

/// Geometry of a shape, in the shape's local space.
#[derive(Debug, Clone)]
pub enum ShapeKind {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    /// Triangles baked into world space under a split BVH
    Mesh(Bvh),
    /// Local-space triangles under one bounding volume
    BvhBox(Bvh),
}

/// A renderable primitive placed in the world by its frame.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Must be locked before rendering
    pub frame: Frame,
    pub material: MaterialId,
}

impl Shape {
    pub fn new(kind: ShapeKind, material: MaterialId) -> Self {
        Self {
            kind,
            frame: Frame::default(),
            material,
        }
    }

    pub fn sphere(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self::new(ShapeKind::Sphere(Sphere::new(center, radius)), material)
    }

    pub fn plane(normal: Vec3, point: Vec3, material: MaterialId) -> Self {
        Self::new(ShapeKind::Plane(Plane::new(normal, point)), material)
    }

    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3, material: MaterialId) -> Self {
        Self::new(ShapeKind::Triangle(Triangle::new(v0, v1, v2)), material)
    }

    /// Mesh with its vertices transformed to world space by `placement`.
    ///
    /// The shape's own frame stays identity.
    pub fn mesh(mesh: &TriangleMesh, placement: &Frame, max_depth: usize, material: MaterialId) -> Self {
        let triangles = mesh
            .triangles()
            .map(|tri| Triangle::from_vertices(tri.map(|v| placement.point_to_world(v))))
            .collect();

        Self::new(ShapeKind::Mesh(Bvh::build(triangles, max_depth)), material)
    }

    /// Mesh kept in local space inside a single bounding volume, placed by `frame`.
    pub fn bvh_box(mesh: &TriangleMesh, frame: Frame, material: MaterialId) -> Self {
        let triangles = mesh.triangles().map(Triangle::from_vertices).collect();

        Self {
            kind: ShapeKind::BvhBox(Bvh::build(triangles, 0)),
            frame,
            material,
        }
    }

    /// Replace the shape's frame.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Intersect a world-space ray.
    ///
    /// The ray is carried into the shape's frame, intersected there, and the
    /// hit is brought back: the point through `frame_to_world`, the normal
    /// through the inverse transpose. `t` is re-measured along the world ray.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let local_ray = self.frame.ray_to_frame(ray);
        if local_ray.direction == Vec3::ZERO {
            return None;
        }

        let hit = self.intersect_local(&local_ray)?;

        let point = self.frame.point_to_world(hit.point);
        let normal = self.frame.normal_to_world(hit.normal).normalize_or_zero();
        let t = (point - ray.origin).dot(ray.direction);

        Some(Intersection::new(t, point, normal, self.material, *ray))
    }

    fn intersect_local(&self, ray: &Ray) -> Option<LocalHit> {
        match &self.kind {
            ShapeKind::Sphere(sphere) => sphere.intersect(ray),
            ShapeKind::Plane(plane) => plane.intersect(ray),
            ShapeKind::Triangle(triangle) => triangle.intersect(ray),
            ShapeKind::Mesh(bvh) | ShapeKind::BvhBox(bvh) => bvh.traverse(ray),
        }
    }
}
