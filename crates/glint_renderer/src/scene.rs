//! Scene container: shapes plus the material arena they index into.

use crate::hittable::{closest_intersect, Intersection};
use crate::material::Material;
use crate::shape::Shape;
use glint_math::Ray;
use thiserror::Error;

/// Handle to a material stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Shape references unknown material {0:?} (scene has {1} materials)")]
    UnknownMaterial(MaterialId, usize),
}

/// Shapes and materials for one render. Read-only once rendering starts.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Add a shape. Its material must already be registered.
    pub fn add_shape(&mut self, shape: Shape) -> Result<(), SceneError> {
        if shape.material.0 >= self.materials.len() {
            return Err(SceneError::UnknownMaterial(
                shape.material,
                self.materials.len(),
            ));
        }
        self.shapes.push(shape);
        Ok(())
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Look up a material.
    ///
    /// Ids handed out by [`Scene::add_material`] are always valid.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Nearest hit across every shape in the scene.
    pub fn closest_intersect(&self, ray: &Ray) -> Option<Intersection> {
        closest_intersect(&self.shapes, ray)
    }
}
