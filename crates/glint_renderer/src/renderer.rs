//! Render orchestration.
//!
//! The image is split into vertical strips rendered on a fixed-size rayon
//! pool. Every strip draws from its own random stream, so a fixed seed gives
//! the same image regardless of scheduling.

use std::path::Path;
use std::time::Instant;

use glint_core::Environment;
use glint_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::filter::{gaussian_blur, median_filter};
use crate::material::Color;
use crate::output::{save_png, RenderError, RenderResult};
use crate::random::{seed_from_clock, Random};
use crate::scene::Scene;
use crate::strip::{generate_strips, render_strip, Progress, StripResult};

/// Display gamma exponent applied after clamping.
pub const DISPLAY_GAMMA: f32 = 1.0 / 1.8;

/// Post-pass used when denoising is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Median,
    Gaussian,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of bounces after the camera hit
    pub max_depth: u32,
    /// Number of worker threads and image strips
    pub threads: usize,
    /// Whether missed rays pick up sky or environment map light
    pub use_environment_light: bool,
    /// Run the post filter after rendering
    pub denoise: bool,
    pub filter: FilterKind,
    /// Fixed base seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            samples_per_pixel: 64,
            max_depth: 8,
            threads: 10,
            use_environment_light: true,
            denoise: false,
            filter: FilterKind::Median,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_environment_light(mut self, enabled: bool) -> Self {
        self.use_environment_light = enabled;
        self
    }

    pub fn with_denoise(mut self, filter: Option<FilterKind>) -> Self {
        self.denoise = filter.is_some();
        if let Some(filter) = filter {
            self.filter = filter;
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.threads == 0 {
            return Err(RenderError::InvalidConfig(
                "threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a worker reads while rendering. Never mutated during a render.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub camera: Camera,
    pub scene: Scene,
    pub environment: Environment,
    pub use_environment_light: bool,
}

impl RenderContext {
    pub fn new(
        camera: Camera,
        scene: Scene,
        environment: Environment,
        use_environment_light: bool,
    ) -> Self {
        Self {
            camera,
            scene,
            environment,
            use_environment_light,
        }
    }

    /// Light arriving from the environment along `direction`.
    pub fn environment_radiance(&self, direction: Vec3) -> Color {
        if self.use_environment_light {
            self.environment.radiance(direction)
        } else {
            Color::ZERO
        }
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub width: u32,
    pub height: u32,
    /// 8-bit RGB, row-major, top row first
    pub pixels: Vec<u8>,
    /// Averaged radiance before tone mapping, same layout
    pub linear: Vec<Color>,
}

impl RenderOutput {
    /// Get the 8-bit color at (x, y).
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y * self.width + x) as usize * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        save_png(path, &self.pixels, self.width, self.height)
    }
}

/// Clamp, gamma, quantize.
pub fn tone_map(color: Color) -> [u8; 3] {
    let c = color.clamp(Color::ZERO, Color::ONE).powf(DISPLAY_GAMMA) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Render the scene seen by `ctx.camera`.
///
/// Blocks until every strip is done.
pub fn render(ctx: &RenderContext, config: &RenderConfig) -> RenderResult<RenderOutput> {
    config.validate()?;

    let strips = generate_strips(config.width, config.height, config.threads);
    let base_seed = config.seed.unwrap_or_else(seed_from_clock);
    let progress = Progress::new(config.width as usize);

    log::info!(
        "Rendering {}x{} at {} spp, depth {}, {} strips (seed {})",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        strips.len(),
        base_seed
    );
    let start = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let results: Vec<StripResult> = pool.install(|| {
        use rayon::prelude::*;
        strips
            .par_iter()
            .map(|strip| {
                let mut rng = Random::for_stream(base_seed, strip.index as u64);
                render_strip(strip, ctx, config, &mut rng, &progress)
            })
            .collect()
    });

    let (width, height) = (config.width as usize, config.height as usize);
    let mut linear = vec![Color::ZERO; width * height];
    for result in &results {
        let strip = result.strip;
        for y in 0..strip.height as usize {
            let src = y * strip.width as usize;
            let dst = y * width + strip.x as usize;
            linear[dst..dst + strip.width as usize]
                .copy_from_slice(&result.pixels[src..src + strip.width as usize]);
        }
    }

    let mut pixels: Vec<u8> = linear.iter().flat_map(|&c| tone_map(c)).collect();

    if config.denoise {
        log::info!("Applying {:?} filter", config.filter);
        pixels = match config.filter {
            FilterKind::Median => median_filter(&pixels, config.width, config.height),
            FilterKind::Gaussian => gaussian_blur(&pixels, config.width, config.height),
        };
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    debug_assert_eq!(pixels.len(), width * height * 3);

    Ok(RenderOutput {
        width: config.width,
        height: config.height,
        pixels,
        linear,
    })
}

/// Render and write the result as PNG.
pub fn render_to_file<P: AsRef<Path>>(
    ctx: &RenderContext,
    config: &RenderConfig,
    path: P,
) -> RenderResult<RenderOutput> {
    let output = render(ctx, config)?;
    output.save_png(path)?;
    Ok(output)
}
