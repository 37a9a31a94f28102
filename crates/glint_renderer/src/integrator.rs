//! Recursive Monte Carlo estimator for the light leaving a surface.

use crate::hittable::Intersection;
use crate::material::Color;
use crate::random::Random;
use crate::renderer::RenderContext;

/// Lowest Russian-roulette survival probability.
const MIN_SURVIVAL: f32 = 0.01;

/// Radiance leaving `surface` towards the origin of its incoming ray.
///
/// Paths end after `depth` more bounces, when the material stops them, or
/// by Russian roulette on the strength of the sampled reflectance.
pub fn illuminance(
    surface: &Intersection,
    depth: u32,
    ctx: &RenderContext,
    rng: &mut Random,
) -> Color {
    let material = ctx.scene.material(surface.material);
    let le = material.le(&surface.incoming, surface.point);

    if depth == 0 {
        return le;
    }

    let Some(wi) = material.sample_wi(&surface.incoming, surface.point, surface.normal, rng)
    else {
        return le;
    };

    let next = ctx.scene.closest_intersect(&wi);
    let fr = material.fr(&wi, &surface.incoming, surface.normal);

    let p = fr.max_element().clamp(MIN_SURVIVAL, 1.0);
    if rng.uniform_f32() > p {
        return Color::ZERO;
    }

    let li = match next {
        Some(hit) => illuminance(&hit, depth - 1, ctx, rng),
        None => ctx.environment_radiance(wi.direction),
    };

    le + fr * li / p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::material::Material;
    use crate::scene::Scene;
    use crate::shape::Shape;
    use glint_core::Environment;
    use glint_math::{Ray, Vec3};

    fn context(scene: Scene, use_environment_light: bool) -> RenderContext {
        RenderContext::new(
            Camera::new(1.0, 8, 8, 1.0, 0.0),
            scene,
            Environment::default(),
            use_environment_light,
        )
    }

    #[test]
    fn test_depth_zero_returns_emission() {
        let mut scene = Scene::new();
        let light = scene.add_material(Material::emissive(Vec3::new(1.0, 0.9, 0.8), 5.0));
        let white = scene.add_material(Material::diffuse(Vec3::ONE));
        scene
            .add_shape(Shape::sphere(Vec3::new(0.0, 0.0, -3.0), 1.0, light))
            .unwrap();
        scene
            .add_shape(Shape::sphere(Vec3::new(3.0, 0.0, -3.0), 1.0, white))
            .unwrap();
        let ctx = context(scene, true);
        let mut rng = Random::new(1);

        let hit = ctx
            .scene
            .closest_intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z))
            .unwrap();
        let le = ctx.scene.material(hit.material).le(&hit.incoming, hit.point);
        assert_eq!(illuminance(&hit, 0, &ctx, &mut rng), le);
        assert_eq!(le, Vec3::new(5.0, 4.5, 4.0));

        let hit = ctx
            .scene
            .closest_intersect(&Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z))
            .unwrap();
        assert_eq!(illuminance(&hit, 0, &ctx, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_emitter_stops_path() {
        let mut scene = Scene::new();
        let light = scene.add_material(Material::emissive(Vec3::ONE, 2.0));
        scene
            .add_shape(Shape::sphere(Vec3::new(0.0, 0.0, -3.0), 1.0, light))
            .unwrap();
        let ctx = context(scene, true);
        let mut rng = Random::new(2);

        let hit = ctx
            .scene
            .closest_intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z))
            .unwrap();
        assert_eq!(illuminance(&hit, 8, &ctx, &mut rng), Vec3::splat(2.0));
    }

    #[test]
    fn test_diffuse_under_open_sky() {
        // White floor lit only by a white sky: every estimate is finite and non-negative
        let mut scene = Scene::new();
        let white = scene.add_material(Material::diffuse(Vec3::ONE));
        scene
            .add_shape(Shape::plane(Vec3::Y, Vec3::ZERO, white))
            .unwrap();
        let mut ctx = context(scene, true);
        ctx.environment.set_sky_gradient(Vec3::ONE, Vec3::ONE);
        let mut rng = Random::new(3);

        let hit = ctx
            .scene
            .closest_intersect(&Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y))
            .unwrap();

        let mut sum = Color::ZERO;
        for _ in 0..2000 {
            let l = illuminance(&hit, 4, &ctx, &mut rng);
            assert!(l.is_finite());
            assert!(l.min_element() >= 0.0);
            sum += l;
        }
        // Uniform hemisphere with Fr = cos: E[L] = E[cos] = 1/2
        let mean = sum / 2000.0;
        assert!((mean.x - 0.5).abs() < 0.05, "mean = {:?}", mean);
    }

    #[test]
    fn test_disabled_environment_is_black() {
        let mut scene = Scene::new();
        let white = scene.add_material(Material::diffuse(Vec3::ONE));
        scene
            .add_shape(Shape::plane(Vec3::Y, Vec3::ZERO, white))
            .unwrap();
        let ctx = context(scene, false);
        let mut rng = Random::new(4);

        let hit = ctx
            .scene
            .closest_intersect(&Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y))
            .unwrap();
        for _ in 0..100 {
            assert_eq!(illuminance(&hit, 4, &ctx, &mut rng), Color::ZERO);
        }
    }
}
