//! Field of small random spheres around three large ones, with depth of field.
//!
//! Run with: cargo run --release --example random_spheres

use glint_core::Environment;
use glint_renderer::{
    render_to_file, Camera, Color, Material, Random, RenderConfig, RenderContext, Scene, Shape,
    Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Glint - Random Spheres");
    println!("======================");

    let start = std::time::Instant::now();
    let scene = build_scene(&mut Random::new(2024))?;
    println!("Scene built in {:?} ({} shapes)", start.elapsed(), scene.len());

    let mut camera = Camera::new(0.35, 800, 450, 1.0, 0.0).with_aperture(0.1);
    camera.look_at(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO)?;

    let config = RenderConfig::default()
        .with_resolution(800, 450)
        .with_samples(32)
        .with_max_depth(8);

    println!(
        "Rendering {}x{} @ {} spp...",
        config.width, config.height, config.samples_per_pixel
    );

    let ctx = RenderContext::new(camera, scene, Environment::default(), true);
    let start = std::time::Instant::now();
    render_to_file(&ctx, &config, "random_spheres.png")?;
    println!("Rendered in {:?}, saved to random_spheres.png", start.elapsed());

    Ok(())
}

fn build_scene(rng: &mut Random) -> Result<Scene, glint_renderer::SceneError> {
    let mut scene = Scene::new();

    let ground = scene.add_material(Material::diffuse(Color::splat(0.5)));
    scene.add_shape(Shape::plane(Vec3::Y, Vec3::ZERO, ground))?;

    let glass = scene.add_material(Material::transmissive(Color::ONE, 1.5));
    let brown = scene.add_material(Material::diffuse(Color::new(0.4, 0.2, 0.1)));
    let steel = scene.add_material(Material::metallic(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add_shape(Shape::sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, glass))?;
    scene.add_shape(Shape::sphere(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown))?;
    scene.add_shape(Shape::sphere(Vec3::new(4.0, 1.0, 0.0), 1.0, steel))?;

    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.uniform_f32(),
                0.2,
                b as f32 + 0.9 * rng.uniform_f32(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let pick = rng.uniform_f32();
            let material = if pick < 0.7 {
                let albedo = Color::new(
                    rng.uniform_f32() * rng.uniform_f32(),
                    rng.uniform_f32() * rng.uniform_f32(),
                    rng.uniform_f32() * rng.uniform_f32(),
                );
                Material::diffuse(albedo)
            } else if pick < 0.85 {
                let albedo = Color::new(
                    0.5 + 0.5 * rng.uniform_f32(),
                    0.5 + 0.5 * rng.uniform_f32(),
                    0.5 + 0.5 * rng.uniform_f32(),
                );
                Material::metallic(albedo, 0.5 * rng.uniform_f32())
            } else if pick < 0.95 {
                let tint = Color::new(rng.uniform_f32(), rng.uniform_f32(), rng.uniform_f32());
                Material::dielectric(tint, 1.5, 0.2, 0.6)
            } else {
                Material::emissive(Color::new(1.0, 0.8, 0.5), 4.0)
            };

            let id = scene.add_material(material);
            scene.add_shape(Shape::sphere(center, 0.2, id))?;
        }
    }

    Ok(scene)
}
