//! Surface materials: emission, reflectance and next-direction sampling.
//!
//! Every material is queried with the outward geometric normal of the
//! surface and flips it towards the incoming ray where it needs to.

use crate::random::Random;
use glint_math::{Ray, Vec3};
use std::f32::consts::PI;

/// Color type alias (linear RGB)
pub type Color = Vec3;

/// Distance secondary rays start off the surface.
const RAY_OFFSET: f32 = 1e-4;

/// Lowest GGX roughness used for sampling and evaluation.
const MIN_ALPHA: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian reflector.
    Diffuse { color: Color },
    /// Light source; reflects nothing.
    Emissive { color: Color, intensity: f32 },
    /// Mirror that scatters diffusely with probability `roughness`.
    Metallic { color: Color, roughness: f32 },
    /// Clear refractor (Snell's law, total internal reflection as a mirror).
    Transmissive { color: Color, ior: f32 },
    /// Cook-Torrance microfacet specular lobe over a diffuse base,
    /// mixed by `specular` in [0, 1].
    Dielectric {
        color: Color,
        ior: f32,
        roughness: f32,
        specular: f32,
    },
}

impl Material {
    pub fn diffuse(color: Color) -> Self {
        Material::Diffuse { color }
    }

    pub fn emissive(color: Color, intensity: f32) -> Self {
        Material::Emissive { color, intensity }
    }

    pub fn metallic(color: Color, roughness: f32) -> Self {
        Material::Metallic {
            color,
            roughness: roughness.clamp(0.0, 1.0),
        }
    }

    pub fn transmissive(color: Color, ior: f32) -> Self {
        Material::Transmissive { color, ior }
    }

    pub fn dielectric(color: Color, ior: f32, roughness: f32, specular: f32) -> Self {
        Material::Dielectric {
            color,
            ior,
            roughness: roughness.clamp(0.0, 1.0),
            specular: specular.clamp(0.0, 1.0),
        }
    }

    pub fn is_emissive(&self) -> bool {
        matches!(self, Material::Emissive { .. })
    }

    /// Radiance emitted at `at` towards the viewer of `wo`.
    pub fn le(&self, _wo: &Ray, _at: Vec3) -> Color {
        match *self {
            Material::Emissive { color, intensity } => color * intensity,
            _ => Color::ZERO,
        }
    }

    /// Reflectance weight for light arriving along `wi` and leaving towards the viewer of `wo`.
    pub fn fr(&self, wi: &Ray, wo: &Ray, normal: Vec3) -> Color {
        match *self {
            Material::Diffuse { color } => {
                let n = face_forward(normal, wo.direction);
                color * wi.direction.dot(n).clamp(0.0, 1.0)
            }
            Material::Emissive { .. } => Color::ZERO,
            Material::Metallic { color, .. } | Material::Transmissive { color, .. } => color,
            Material::Dielectric {
                color,
                ior,
                roughness,
                specular,
            } => {
                let n = face_forward(normal, wo.direction);
                cook_torrance(color, ior, roughness, specular, wi.direction, wo.direction, n)
            }
        }
    }

    /// Pick the next path direction.
    ///
    /// `None` terminates the path (emitters, or an invalid microfacet sample).
    pub fn sample_wi(&self, wo: &Ray, at: Vec3, normal: Vec3, rng: &mut Random) -> Option<Ray> {
        match *self {
            Material::Diffuse { .. } => {
                let n = face_forward(normal, wo.direction);
                Some(Ray::new(at + n * RAY_OFFSET, rng.uniform_hemisphere(n)))
            }
            Material::Emissive { .. } => None,
            Material::Metallic { roughness, .. } => {
                let n = face_forward(normal, wo.direction);
                if rng.uniform_f32() < roughness {
                    Some(Ray::new(at + n * RAY_OFFSET, rng.uniform_hemisphere(n)))
                } else {
                    Some(Ray::new(at + n * RAY_OFFSET, reflect(wo.direction, n)))
                }
            }
            Material::Transmissive { ior, .. } => Some(refract(wo.direction, at, normal, ior)),
            Material::Dielectric {
                ior,
                roughness,
                specular,
                ..
            } => {
                let n = face_forward(normal, wo.direction);
                let cos_out = (-wo.direction).dot(n).clamp(0.0, 1.0);

                if rng.uniform_f32() < specular * fresnel(cos_out, ior) {
                    let h = rng.ggx_half_vector(n, roughness.max(MIN_ALPHA));
                    let dir = reflect(wo.direction, h);
                    if dir.dot(n) <= 0.0 {
                        return None;
                    }
                    Some(Ray::new(at + n * RAY_OFFSET, dir))
                } else {
                    Some(Ray::new(at + n * RAY_OFFSET, rng.cosine_hemisphere(n)))
                }
            }
        }
    }
}

/// Flip `n` so it faces against `dir`.
#[inline]
fn face_forward(n: Vec3, dir: Vec3) -> Vec3 {
    if n.dot(dir) > 0.0 {
        -n
    } else {
        n
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract through a surface with outward normal `outward` and index `ior`.
///
/// Total internal reflection falls back to a mirror bounce.
fn refract(dir: Vec3, at: Vec3, outward: Vec3, ior: f32) -> Ray {
    let (eta, n) = if dir.dot(outward) > 0.0 {
        // Leaving the material
        (ior, -outward)
    } else {
        (1.0 / ior, outward)
    };

    let cos_i = dir.dot(n);
    let discriminant = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if discriminant < 0.0 {
        return Ray::new(at + n * RAY_OFFSET, reflect(dir, n));
    }

    let perpendicular = -discriminant.sqrt() * n;
    let parallel = eta * (dir - cos_i * n);
    Ray::new(at - n * RAY_OFFSET, perpendicular + parallel)
}

/// Schlick's approximation for reflectance
fn fresnel(cos_theta: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

/// GGX normal distribution.
fn ggx_d(cos_h: f32, alpha: f32) -> f32 {
    let alpha2 = alpha * alpha;
    let denom = cos_h * cos_h * (alpha2 - 1.0) + 1.0;
    alpha2 / (PI * denom * denom)
}

/// Cook-Torrance geometric attenuation.
fn geometric_attenuation(cos_in: f32, cos_out: f32, n_dot_h: f32, wo_dot_h: f32) -> f32 {
    let g1 = 2.0 * n_dot_h * cos_out / wo_dot_h;
    let g2 = 2.0 * n_dot_h * cos_in / wo_dot_h;
    g1.min(g2).min(1.0)
}

fn cook_torrance(
    color: Color,
    ior: f32,
    roughness: f32,
    specular: f32,
    wi: Vec3,
    wo: Vec3,
    n: Vec3,
) -> Color {
    let cos_out = n.dot(-wo).clamp(0.0, 1.0);
    let cos_in = n.dot(wi).clamp(0.0, 1.0);
    let diffuse = (1.0 - specular) * color * cos_in / PI;

    let h = (wi - wo).normalize_or_zero();
    let wo_dot_h = (-wo).dot(h).clamp(0.0, 1.0);
    if cos_out <= 1e-6 || wo_dot_h <= 1e-6 {
        return diffuse;
    }

    let n_dot_h = n.dot(h).clamp(0.0, 1.0);
    let d = ggx_d(n_dot_h, roughness.max(MIN_ALPHA));
    let g = geometric_attenuation(cos_in, cos_out, n_dot_h, wo_dot_h);
    let f = fresnel(wo_dot_h, ior);

    diffuse + specular * color * (d * g * f / (4.0 * cos_out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y)
    }

    #[test]
    fn test_emissive() {
        let light = Material::emissive(Vec3::new(1.0, 0.5, 0.25), 4.0);
        let mut rng = Random::new(1);
        let wo = down_ray();

        assert_eq!(light.le(&wo, Vec3::ZERO), Vec3::new(4.0, 2.0, 1.0));
        assert_eq!(light.fr(&wo, &wo, Vec3::Y), Color::ZERO);
        assert!(light.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng).is_none());
        assert!(light.is_emissive());
    }

    #[test]
    fn test_diffuse_samples_outward_hemisphere() {
        let mat = Material::diffuse(Vec3::splat(0.8));
        let mut rng = Random::new(2);
        let wo = down_ray();

        assert_eq!(mat.le(&wo, Vec3::ZERO), Color::ZERO);
        for _ in 0..256 {
            let wi = mat.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng).unwrap();
            assert!(wi.direction.y >= 0.0);
            assert!(wi.origin.y > 0.0);

            let fr = mat.fr(&wi, &wo, Vec3::Y);
            assert!((fr - Vec3::splat(0.8 * wi.direction.y)).length() < 1e-5);
        }
    }

    #[test]
    fn test_diffuse_back_face_flips_normal() {
        let mat = Material::diffuse(Vec3::ONE);
        let mut rng = Random::new(3);
        // Hitting the underside of a +Y facing surface
        let wo = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);

        for _ in 0..64 {
            let wi = mat.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng).unwrap();
            assert!(wi.direction.y <= 0.0);
            assert!(wi.origin.y < 0.0);
        }
    }

    #[test]
    fn test_mirror_reflection() {
        let mirror = Material::metallic(Vec3::ONE, 0.0);
        let mut rng = Random::new(4);
        let wo = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let wi = mirror.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((wi.direction - expected).length() < 1e-5);
        assert!((wi.origin - Vec3::new(0.0, RAY_OFFSET, 0.0)).length() < 1e-7);
        assert_eq!(mirror.fr(&wi, &wo, Vec3::Y), Vec3::ONE);
    }

    #[test]
    fn test_rough_metal_scatters() {
        let metal = Material::metallic(Vec3::ONE, 1.0);
        let mut rng = Random::new(5);
        let wo = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mirror_dir = Vec3::new(1.0, 1.0, 0.0).normalize();

        let scattered = (0..32)
            .filter_map(|_| metal.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng))
            .filter(|wi| (wi.direction - mirror_dir).length() > 1e-3)
            .count();
        assert_eq!(scattered, 32);
    }

    #[test]
    fn test_transmissive_enters_and_exits_straight() {
        let glass = Material::transmissive(Vec3::ONE, 1.5);
        let mut rng = Random::new(6);

        // Normal incidence passes straight through
        let wi = glass
            .sample_wi(&down_ray(), Vec3::ZERO, Vec3::Y, &mut rng)
            .unwrap();
        assert!((wi.direction - Vec3::NEG_Y).length() < 1e-5);
        assert!(wi.origin.y < 0.0);

        // Exiting from inside (ray travels along the outward normal)
        let inside = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let wi = glass.sample_wi(&inside, Vec3::ZERO, Vec3::Y, &mut rng).unwrap();
        assert!((wi.direction - Vec3::Y).length() < 1e-5);
        assert!(wi.origin.y > 0.0);
    }

    #[test]
    fn test_transmissive_bends_towards_normal() {
        let glass = Material::transmissive(Vec3::ONE, 1.5);
        let mut rng = Random::new(7);
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let wo = Ray::new(Vec3::new(-1.0, 1.0, 0.0), incoming);

        let wi = glass.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng).unwrap();
        // Snell: sin(t) = sin(i) / 1.5
        let sin_t = wi.direction.x;
        assert!((sin_t - incoming.x / 1.5).abs() < 1e-4);
        assert!(wi.direction.y < 0.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        let glass = Material::transmissive(Vec3::ONE, 1.5);
        let mut rng = Random::new(8);
        // Grazing ray inside the glass heading out through a +Y surface
        let dir = Vec3::new(1.0, 0.2, 0.0).normalize();
        let wo = Ray::new(Vec3::new(-1.0, -0.2, 0.0), dir);

        let wi = glass.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng).unwrap();
        assert!((wi.direction - Vec3::new(dir.x, -dir.y, 0.0)).length() < 1e-5);
        assert!(wi.origin.y < 0.0);
    }

    #[test]
    fn test_dielectric_is_finite_and_non_negative() {
        let mat = Material::dielectric(Vec3::new(0.9, 0.6, 0.3), 1.5, 0.3, 0.5);
        let mut rng = Random::new(9);
        let wo = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        for _ in 0..512 {
            if let Some(wi) = mat.sample_wi(&wo, Vec3::ZERO, Vec3::Y, &mut rng) {
                assert!(wi.direction.y > 0.0);
                let fr = mat.fr(&wi, &wo, Vec3::Y);
                assert!(fr.is_finite());
                assert!(fr.min_element() >= 0.0);
            }
        }
    }

    #[test]
    fn test_dielectric_pure_diffuse_matches_lambert() {
        let mat = Material::dielectric(Vec3::ONE, 1.5, 0.5, 0.0);
        let wo = down_ray();
        let wi = Ray::new(Vec3::ZERO, Vec3::Y);

        let fr = mat.fr(&wi, &wo, Vec3::Y);
        assert!((fr - Vec3::splat(1.0 / PI)).length() < 1e-5);
    }

    #[test]
    fn test_fresnel_limits() {
        // Normal incidence gives r0, grazing approaches 1
        assert!((fresnel(1.0, 1.5) - 0.04).abs() < 1e-4);
        assert!((fresnel(0.0, 1.5) - 1.0).abs() < 1e-5);
    }
}
