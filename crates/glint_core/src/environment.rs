//! Environment lighting.
//!
//! Rays that leave the scene pick up radiance from the environment: either an
//! equirectangular HDR map, when one is loaded, or an analytic vertical sky
//! gradient.

use std::f32::consts::PI;
use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

/// Errors that can occur while loading environment maps.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Failed to load environment map {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Environment map has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Pixel count {actual} does not match {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

/// Analytic sky: blends from `bottom` (looking straight down) to `top`
/// (looking straight up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    pub top: Vec3,
    pub bottom: Vec3,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            top: Vec3::new(0.1, 0.5, 0.9),
            bottom: Vec3::ONE,
        }
    }
}

impl SkyGradient {
    pub fn new(top: Vec3, bottom: Vec3) -> Self {
        Self { top, bottom }
    }

    /// Radiance arriving from `direction` (assumed unit length).
    pub fn radiance(&self, direction: Vec3) -> Vec3 {
        let t = 0.5 * (direction.y + 1.0);
        self.bottom.lerp(self.top, t)
    }
}

/// Float RGB equirectangular environment map.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    width: u32,
    height: u32,
    /// Row-major, row 0 is straight up
    pixels: Vec<Vec3>,
}

impl EnvironmentMap {
    /// Load an HDR (or any format `image` decodes) as linear float RGB.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EnvironmentError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| EnvironmentError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb32f();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();

        let map = Self::from_pixels(width, height, pixels)?;
        log::debug!(
            "Loaded environment map: {} ({}x{})",
            path.display(),
            width,
            height
        );
        Ok(map)
    }

    /// Wrap an already decoded buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec3>) -> Result<Self, EnvironmentError> {
        if width == 0 || height == 0 {
            return Err(EnvironmentError::Empty { width, height });
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(EnvironmentError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-pixel lookup for a unit direction.
    pub fn sample(&self, direction: Vec3) -> Vec3 {
        let theta = direction.y.clamp(-1.0, 1.0).acos();
        let mut phi = direction.z.atan2(direction.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }

        let u = phi / (2.0 * PI);
        let v = theta / PI;

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.pixels[(y * self.width + x) as usize]
    }
}

/// Everything a ray escaping the scene can see.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    pub sky: SkyGradient,
    pub map: Option<EnvironmentMap>,
}

impl Environment {
    /// Gradient-only environment.
    pub fn new(sky: SkyGradient) -> Self {
        Self { sky, map: None }
    }

    /// Load an environment map, replacing any previous one.
    ///
    /// On failure the current state is left unchanged.
    pub fn load_map<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EnvironmentError> {
        self.map = Some(EnvironmentMap::load(path)?);
        Ok(())
    }

    pub fn set_map(&mut self, map: EnvironmentMap) {
        self.map = Some(map);
    }

    /// Configure the fallback sky used when no map is loaded.
    pub fn set_sky_gradient(&mut self, top: Vec3, bottom: Vec3) {
        self.sky = SkyGradient::new(top, bottom);
    }

    /// Drop the loaded map and fall back to the gradient.
    pub fn release_map(&mut self) {
        self.map = None;
    }

    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }

    /// Radiance arriving from `direction`.
    pub fn radiance(&self, direction: Vec3) -> Vec3 {
        match &self.map {
            Some(map) => map.sample(direction),
            None => self.sky.radiance(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let sky = SkyGradient::default();

        assert!((sky.radiance(Vec3::Y) - sky.top).length() < 1e-6);
        assert!((sky.radiance(Vec3::NEG_Y) - sky.bottom).length() < 1e-6);

        let horizon = sky.radiance(Vec3::X);
        assert!((horizon - (sky.top + sky.bottom) * 0.5).length() < 1e-6);
    }

    fn quadrant_map() -> EnvironmentMap {
        // 4x2: top row bright, bottom row dark, columns tagged in x
        let mut pixels = Vec::new();
        for row in 0..2 {
            for col in 0..4 {
                let level = if row == 0 { 1.0 } else { 0.0 };
                pixels.push(Vec3::new(col as f32, level, 0.0));
            }
        }
        EnvironmentMap::from_pixels(4, 2, pixels).unwrap()
    }

    #[test]
    fn test_map_sample_rows() {
        let map = quadrant_map();

        // Up looks at row 0, down at the last row
        assert_eq!(map.sample(Vec3::Y).y, 1.0);
        assert_eq!(map.sample(Vec3::NEG_Y).y, 0.0);
    }

    #[test]
    fn test_map_sample_columns() {
        let map = quadrant_map();
        let slightly_up = 0.1;

        // phi = 0 along +X, increasing towards +Z
        let c = map.sample(Vec3::new(1.0, slightly_up, 0.0).normalize());
        assert_eq!(c.x, 0.0);
        let c = map.sample(Vec3::new(0.0, slightly_up, 1.0).normalize());
        assert_eq!(c.x, 1.0);
        let c = map.sample(Vec3::new(-1.0, slightly_up, 0.01).normalize());
        assert_eq!(c.x, 1.0);
        // Negative phi wraps to the far end
        let c = map.sample(Vec3::new(0.0, slightly_up, -1.0).normalize());
        assert_eq!(c.x, 3.0);
    }

    #[test]
    fn test_from_pixels_validates_size() {
        assert!(matches!(
            EnvironmentMap::from_pixels(2, 2, vec![Vec3::ZERO; 3]),
            Err(EnvironmentError::SizeMismatch { actual: 3, .. })
        ));
        assert!(matches!(
            EnvironmentMap::from_pixels(0, 2, Vec::new()),
            Err(EnvironmentError::Empty { .. })
        ));
    }

    #[test]
    fn test_environment_falls_back_to_sky() {
        let mut env = Environment::default();
        assert!(!env.has_map());
        assert_eq!(env.radiance(Vec3::Y), env.sky.top);

        env.set_map(quadrant_map());
        assert!(env.has_map());
        assert_eq!(env.radiance(Vec3::Y).y, 1.0);

        env.release_map();
        assert!(!env.has_map());
        assert_eq!(env.radiance(Vec3::Y), env.sky.top);
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut env = Environment::default();
        env.set_map(quadrant_map());

        let err = env.load_map("/no/such/sky.hdr");
        assert!(err.is_err());
        assert!(env.has_map());
    }

    #[test]
    fn test_set_sky_gradient() {
        let mut env = Environment::default();
        env.set_sky_gradient(Vec3::ZERO, Vec3::ONE);
        assert_eq!(env.radiance(Vec3::Y), Vec3::ZERO);
        assert_eq!(env.radiance(Vec3::NEG_Y), Vec3::ONE);
    }
}
