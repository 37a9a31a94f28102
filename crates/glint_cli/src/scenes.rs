//! Built-in scenes.

use std::path::Path;

use anyhow::{Context, Result};
use glint_core::{load_obj, TriangleMesh};
use glint_math::{Frame, Vec3};
use glint_renderer::{Camera, Material, MaterialId, Scene, Shape, DEFAULT_MESH_DEPTH};

use crate::args::SceneKind;

const BOX_HALF_WIDTH: f32 = 3.5;
const BOX_HALF_HEIGHT: f32 = 2.0;
const BOX_DEPTH: f32 = 7.0;

/// A camera and the shapes it looks at.
pub struct BuiltScene {
    pub camera: Camera,
    pub scene: Scene,
}

pub fn build(kind: SceneKind, obj: Option<&Path>, width: u32, height: u32) -> Result<BuiltScene> {
    let built = match kind {
        SceneKind::Cornell => cornell_box(width, height)?,
        SceneKind::Spheres => spheres(width, height)?,
        SceneKind::Mesh => {
            let path = obj.context("the mesh scene needs --obj <PATH>")?;
            mesh_in_box(path, width, height)?
        }
    };

    log::info!(
        "Built {:?} scene: {} shapes, {} materials",
        kind,
        built.scene.len(),
        built.scene.material_count()
    );
    Ok(built)
}

/// Two triangles spanning the quad `a b c d` (counter-clockwise seen from the front).
fn add_quad(scene: &mut Scene, [a, b, c, d]: [Vec3; 4], material: MaterialId) -> Result<()> {
    scene.add_shape(Shape::triangle(a, b, c, material))?;
    scene.add_shape(Shape::triangle(a, c, d, material))?;
    Ok(())
}

/// Walls of a box open towards +Z, seen from inside.
fn add_box_walls(scene: &mut Scene) -> Result<()> {
    let white = scene.add_material(Material::diffuse(Vec3::splat(0.8)));
    let red = scene.add_material(Material::diffuse(Vec3::new(0.9, 0.1, 0.1)));
    let green = scene.add_material(Material::diffuse(Vec3::new(0.1, 0.9, 0.1)));

    let (w, h, d) = (BOX_HALF_WIDTH, BOX_HALF_HEIGHT, -BOX_DEPTH);

    // Back
    add_quad(
        scene,
        [
            Vec3::new(-w, -h, d),
            Vec3::new(w, -h, d),
            Vec3::new(w, h, d),
            Vec3::new(-w, h, d),
        ],
        white,
    )?;
    // Floor
    add_quad(
        scene,
        [
            Vec3::new(-w, -h, 0.0),
            Vec3::new(w, -h, 0.0),
            Vec3::new(w, -h, d),
            Vec3::new(-w, -h, d),
        ],
        white,
    )?;
    // Ceiling
    add_quad(
        scene,
        [
            Vec3::new(-w, h, d),
            Vec3::new(w, h, d),
            Vec3::new(w, h, 0.0),
            Vec3::new(-w, h, 0.0),
        ],
        white,
    )?;
    // Left
    add_quad(
        scene,
        [
            Vec3::new(-w, -h, 0.0),
            Vec3::new(-w, -h, d),
            Vec3::new(-w, h, d),
            Vec3::new(-w, h, 0.0),
        ],
        red,
    )?;
    // Right
    add_quad(
        scene,
        [
            Vec3::new(w, -h, d),
            Vec3::new(w, -h, 0.0),
            Vec3::new(w, h, 0.0),
            Vec3::new(w, h, d),
        ],
        green,
    )?;

    Ok(())
}

fn box_camera(width: u32, height: u32) -> Result<Camera> {
    let mut camera = Camera::new(1.0, width, height, 1.0, 0.0);
    camera.look_at(Vec3::new(0.0, 0.0, 2.5), Vec3::new(0.0, 0.0, -3.0))?;
    Ok(camera)
}

/// Closed-ish box with an emissive ceiling sphere and a few material samples.
pub fn cornell_box(width: u32, height: u32) -> Result<BuiltScene> {
    let mut scene = Scene::new();
    add_box_walls(&mut scene)?;

    let light = scene.add_material(Material::emissive(Vec3::new(1.0, 0.95, 0.85), 6.0));
    let chrome = scene.add_material(Material::metallic(Vec3::splat(0.9), 0.05));
    let glass = scene.add_material(Material::transmissive(Vec3::ONE, 1.5));
    let plastic = scene.add_material(Material::dielectric(Vec3::new(0.2, 0.3, 0.8), 1.5, 0.3, 0.5));

    scene.add_shape(Shape::sphere(Vec3::new(0.0, BOX_HALF_HEIGHT + 0.3, -4.0), 0.9, light))?;
    scene.add_shape(Shape::sphere(Vec3::new(-1.6, -1.2, -4.5), 0.8, chrome))?;
    scene.add_shape(Shape::sphere(Vec3::new(1.5, -1.3, -3.5), 0.7, glass))?;

    // Squashed sphere through a scaled, rotated frame
    let frame = Frame::new()
        .with_origin(Vec3::new(0.2, -1.6, -5.5))
        .with_scale(Vec3::new(1.0, 0.4, 0.7))
        .with_rotation(Vec3::new(0.0, 0.6, 0.0))
        .locked()?;
    scene.add_shape(Shape::sphere(Vec3::ZERO, 1.0, plastic).with_frame(frame))?;

    Ok(BuiltScene {
        camera: box_camera(width, height)?,
        scene,
    })
}

/// Material showcase: spheres resting on an infinite plane under the sky.
pub fn spheres(width: u32, height: u32) -> Result<BuiltScene> {
    let mut scene = Scene::new();

    let light = scene.add_material(Material::emissive(Vec3::ONE, 1.0));
    let blue = scene.add_material(Material::diffuse(Vec3::new(0.2, 0.3, 0.8)));
    let metal = scene.add_material(Material::metallic(Vec3::new(0.2, 0.3, 0.8), 0.2));
    let ground = scene.add_material(Material::diffuse(Vec3::new(0.8, 0.1, 0.8)));
    let coated = scene.add_material(Material::dielectric(Vec3::new(0.9, 0.6, 0.2), 1.45, 0.15, 0.8));

    scene.add_shape(Shape::plane(Vec3::Y, Vec3::new(0.0, -2.0, 0.0), ground))?;
    scene.add_shape(Shape::sphere(Vec3::new(0.0, 0.0, -2.0), 1.0, light))?;
    scene.add_shape(Shape::sphere(Vec3::new(3.0, -1.0, -4.0), 1.0, metal))?;
    scene.add_shape(Shape::sphere(Vec3::new(-3.0, -1.0, -4.0), 1.0, blue))?;
    scene.add_shape(Shape::sphere(Vec3::new(0.0, -1.2, -6.0), 0.8, coated))?;
    scene.add_shape(Shape::triangle(
        Vec3::new(-10.0, 5.0, -9.0),
        Vec3::new(10.0, 5.0, -9.0),
        Vec3::new(0.0, -10.0, -9.0),
        blue,
    ))?;

    let mut camera = Camera::new(1.2, width, height, 1.0, 0.0);
    camera.look_at(Vec3::new(0.0, 0.5, 3.0), Vec3::new(0.0, -0.5, -4.0))?;

    Ok(BuiltScene { camera, scene })
}

/// Frame that sits `mesh` on the box floor, scaled to about half the box height.
fn floor_placement(mesh: &TriangleMesh) -> Result<Frame> {
    let extent = mesh.bounds.max() - mesh.bounds.min();
    let scale = BOX_HALF_HEIGHT / extent.max_element().max(f32::EPSILON);
    let center = mesh.center();
    let lift = (center.y - mesh.bounds.min().y) * scale;

    let frame = Frame::new()
        .with_scale(Vec3::splat(scale))
        .with_rotation(Vec3::new(0.0, 0.9, 0.0))
        .locked()?;
    let offset = Vec3::new(0.0, -BOX_HALF_HEIGHT + lift, -4.5) - frame.point_to_world(center);
    let frame = frame.with_origin(offset).locked()?;

    Ok(frame)
}

/// An OBJ mesh standing in the box.
pub fn mesh_in_box(path: &Path, width: u32, height: u32) -> Result<BuiltScene> {
    let mesh = load_obj(path).with_context(|| format!("Failed to load mesh {}", path.display()))?;
    log::info!("Loaded {} ({} triangles)", path.display(), mesh.triangle_count());

    let mut scene = Scene::new();
    add_box_walls(&mut scene)?;

    let light = scene.add_material(Material::emissive(Vec3::ONE, 6.0));
    let clay = scene.add_material(Material::diffuse(Vec3::new(0.1, 0.1, 0.9)));
    scene.add_shape(Shape::sphere(Vec3::new(0.0, BOX_HALF_HEIGHT + 0.3, -4.0), 0.9, light))?;

    let placement = floor_placement(&mesh)?;
    scene.add_shape(Shape::mesh(&mesh, &placement, DEFAULT_MESH_DEPTH, clay))?;

    Ok(BuiltScene {
        camera: box_camera(width, height)?,
        scene,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Ray;

    #[test]
    fn test_cornell_box_camera_sees_back_wall() {
        let built = cornell_box(64, 48).unwrap();
        let hit = built
            .scene
            .closest_intersect(&Ray::new(Vec3::new(0.0, 0.0, 2.5), Vec3::NEG_Z))
            .unwrap();
        assert!((hit.point.z + BOX_DEPTH).abs() < 1e-3);
    }

    #[test]
    fn test_spheres_scene_hits_light() {
        let built = spheres(64, 48).unwrap();
        let hit = built
            .scene
            .closest_intersect(&Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z))
            .unwrap();
        assert!(built.scene.material(hit.material).is_emissive());
    }

    #[test]
    fn test_mesh_scene_needs_path() {
        assert!(build(SceneKind::Mesh, None, 8, 8).is_err());
    }

    #[test]
    fn test_mesh_scene_from_obj() {
        let path = std::env::temp_dir().join("glint_cli_cube.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 0 1\nv 1 0 1\nv 1 1 1\nv 0 1 1\n\
             f 1 4 3 2\nf 5 6 7 8\nf 1 2 6 5\nf 4 8 7 3\nf 1 5 8 4\nf 2 3 7 6\n",
        )
        .unwrap();

        let built = build(SceneKind::Mesh, Some(&path), 16, 16).unwrap();
        // 10 wall triangles, the light, the mesh
        assert_eq!(built.scene.len(), 12);

        // Unit cube scaled to the box half height, resting on the floor
        let hit = built
            .scene
            .closest_intersect(&Ray::new(Vec3::new(0.1, 1.0, -4.4), Vec3::NEG_Y))
            .unwrap();
        assert!(hit.point.y.abs() < 1e-3, "hit at {:?}", hit.point);

        let _ = std::fs::remove_file(&path);
    }
}
