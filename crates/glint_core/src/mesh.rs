//! Triangle-soup mesh geometry.
//!
//! A [`TriangleMesh`] is the hand-off format between asset loading and the
//! renderer: flat vertex positions plus triangle indices. The renderer only
//! ever asks it for triangles as `[Vec3; 3]` triplets.

use std::path::Path;

use glint_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors that can occur while loading mesh files.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ {path}: {source}")]
    Obj {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("No triangles found in {0}")]
    Empty(String),

    #[error("Triangle index {index} out of range (vertex count {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl TriangleMesh {
    /// Create a mesh from positions and indices.
    ///
    /// Every index must reference an existing vertex and the index count must
    /// be a multiple of three.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }

        let bounds = Aabb::from_point_cloud(positions.iter().copied());
        let mut indices = indices;
        indices.truncate(indices.len() - indices.len() % 3);

        Ok(Self {
            positions,
            indices,
            bounds,
        })
    }

    /// Build a mesh from explicit triangles (no vertex sharing).
    pub fn from_triangles(triangles: &[[Vec3; 3]]) -> Self {
        let positions: Vec<Vec3> = triangles.iter().flatten().copied().collect();
        let indices = (0..positions.len() as u32).collect();
        let bounds = Aabb::from_point_cloud(positions.iter().copied());

        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertices of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let face = &self.indices[i * 3..i * 3 + 3];
        [
            self.positions[face[0] as usize],
            self.positions[face[1] as usize],
            self.positions[face[2] as usize],
        ]
    }

    /// Iterate over all triangles as vertex triplets.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }
}

/// Load an OBJ file, merging every model it contains into one triangle soup.
///
/// Faces are triangulated on load. Normals, texture coordinates and
/// materials in the file are ignored.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<TriangleMesh, MeshError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| MeshError::Obj {
        path: display.clone(),
        source,
    })?;

    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let base = positions.len() as u32;

        positions.extend(mesh.positions.chunks_exact(3).map(Vec3::from_slice));
        indices.extend(mesh.indices.iter().map(|&i| base + i));
    }

    if indices.len() < 3 {
        return Err(MeshError::Empty(display));
    }

    let mesh = TriangleMesh::new(positions, indices)?;

    log::debug!(
        "Loaded {}: {} models, {} vertices, {} triangles",
        display,
        models.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn quad() -> TriangleMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        TriangleMesh::new(positions, vec![0, 1, 2, 1, 3, 2]).unwrap()
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = quad();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.bounds.min().x, 0.0);
        assert_eq!(mesh.bounds.max().y, 1.0);
    }

    #[test]
    fn test_triangles() {
        let mesh = quad();
        let triangles: Vec<_> = mesh.triangles().collect();

        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[1][0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(triangles[1][1], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1][2], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_index_out_of_range() {
        let result = TriangleMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 3]);
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_from_triangles() {
        let mesh = TriangleMesh::from_triangles(&[
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec3::Z, Vec3::X, Vec3::Y],
        ]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle(1)[0], Vec3::Z);
    }

    #[test]
    fn test_load_obj_merges_models() {
        let path = std::env::temp_dir().join("glint_mesh_two_objects.obj");
        fs::write(
            &path,
            "o first\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o second\n\
             v 0 0 1\nv 1 0 1\nv 1 1 1\nv 0 1 1\nf 4 5 6 7\n",
        )
        .unwrap();

        let mesh = load_obj(&path).unwrap();
        fs::remove_file(&path).ok();

        // One triangle plus a triangulated quad
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.bounds.max().z, 1.0);
        for tri in mesh.triangles() {
            assert!(tri.iter().all(|v| v.z == tri[0].z));
        }
    }

    #[test]
    fn test_load_missing_obj() {
        let err = load_obj("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshError::Obj { .. }));
    }
}
