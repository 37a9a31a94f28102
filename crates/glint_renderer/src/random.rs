//! Seeded sampling for the path tracer.
//!
//! Each render worker owns its own [`Random`]; nothing here is shared
//! between threads.

use std::f32::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Odd 64-bit constant (2^64 / golden ratio) used to spread stream seeds apart.
const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-thread random generator producing uniform floats and sampled directions.
#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator for stream `stream` derived from a shared base seed.
    ///
    /// Distinct streams of the same base never share a seed.
    pub fn for_stream(base: u64, stream: u64) -> Self {
        Self::new(base.wrapping_add(stream.wrapping_add(1).wrapping_mul(STREAM_STRIDE)))
    }

    /// Uniform float in [0, 1).
    #[inline]
    pub fn uniform_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform point in the unit disc (z = 0).
    pub fn point_in_disc(&mut self) -> Vec3 {
        let r = self.uniform_f32().sqrt();
        let theta = self.uniform_f32() * 2.0 * PI;
        Vec3::new(r * theta.cos(), r * theta.sin(), 0.0)
    }

    /// Uniform point on the unit sphere.
    pub fn point_on_sphere(&mut self) -> Vec3 {
        let theta = self.uniform_f32() * 2.0 * PI;
        let cos_phi = 2.0 * self.uniform_f32() - 1.0;
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();

        Vec3::new(cos_phi, theta.sin() * sin_phi, theta.cos() * sin_phi)
    }

    /// Uniform direction on the hemisphere around `n`.
    pub fn uniform_hemisphere(&mut self, n: Vec3) -> Vec3 {
        let p = self.point_on_sphere();
        if p.dot(n) > 0.0 {
            p
        } else {
            -p
        }
    }

    /// Cosine-weighted direction on the hemisphere around `n` (unit length).
    pub fn cosine_hemisphere(&mut self, n: Vec3) -> Vec3 {
        let disc = self.point_in_disc();
        let z = (1.0 - disc.x * disc.x - disc.y * disc.y).max(0.0).sqrt();
        to_basis(n, Vec3::new(disc.x, disc.y, z))
    }

    /// GGX-distributed microfacet normal around `n` for roughness `alpha`.
    pub fn ggx_half_vector(&mut self, n: Vec3, alpha: f32) -> Vec3 {
        let xi1 = self.uniform_f32();
        let xi2 = self.uniform_f32();

        let theta = (alpha * (xi1 / (1.0 - xi1)).sqrt()).atan();
        let phi = 2.0 * PI * xi2;
        let (sin_theta, cos_theta) = theta.sin_cos();

        to_basis(
            n,
            Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta),
        )
    }
}

/// Express a local (tangent, bitangent, normal) vector in world space.
fn to_basis(n: Vec3, local: Vec3) -> Vec3 {
    let (tangent, bitangent) = n.any_orthonormal_pair();
    (tangent * local.x + bitangent * local.y + n * local.z).normalize_or_zero()
}

/// Seed derived from wall-clock nanoseconds.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
