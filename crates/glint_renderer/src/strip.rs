//! Column-strip partitioning for parallel rendering.
//!
//! The image is cut into vertical strips that are rendered independently,
//! one job per strip, each with its own random stream.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::integrator::illuminance;
use crate::material::Color;
use crate::random::Random;
use crate::renderer::{RenderConfig, RenderContext};

/// A vertical band of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    /// First column of the strip
    pub x: u32,
    /// Width of the strip in columns
    pub width: u32,
    /// Image height (every strip spans all rows)
    pub height: u32,
    /// Index of this strip, left to right
    pub index: usize,
}

impl Strip {
    pub fn new(x: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this strip.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Split `width` columns into `count` contiguous, non-overlapping strips.
///
/// The count is clamped to [1, width]; leftover columns go to the first strips.
pub fn generate_strips(width: u32, height: u32, count: usize) -> Vec<Strip> {
    if width == 0 {
        return Vec::new();
    }

    let count = count.clamp(1, width as usize) as u32;
    let base = width / count;
    let extra = width % count;

    let mut strips = Vec::with_capacity(count as usize);
    let mut x = 0;
    for i in 0..count {
        let w = base + u32::from(i < extra);
        strips.push(Strip::new(x, w, height, i as usize));
        x += w;
    }

    strips
}

/// Linear colors of one strip, row-major within the strip.
#[derive(Debug, Clone)]
pub struct StripResult {
    pub strip: Strip,
    pub pixels: Vec<Color>,
}

/// Shared column counter that logs every 10% of progress.
#[derive(Debug)]
pub struct Progress {
    done: AtomicUsize,
    total: usize,
}

impl Progress {
    pub fn new(total_columns: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total: total_columns.max(1),
        }
    }

    /// Record one finished column.
    pub fn column_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let decile = done * 10 / self.total;
        if decile != (done - 1) * 10 / self.total {
            log::info!("Rendering: {}%", decile * 10);
        }
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

/// Render every pixel of a strip.
pub fn render_strip(
    strip: &Strip,
    ctx: &RenderContext,
    config: &RenderConfig,
    rng: &mut Random,
    progress: &Progress,
) -> StripResult {
    let mut pixels = vec![Color::ZERO; strip.pixel_count() as usize];

    for local_x in 0..strip.width {
        let x = strip.x + local_x;
        for y in 0..strip.height {
            pixels[(y * strip.width + local_x) as usize] = render_pixel(ctx, config, x, y, rng);
        }
        progress.column_done();
    }

    StripResult {
        strip: *strip,
        pixels,
    }
}

/// Average `samples_per_pixel` jittered camera samples for pixel (x, y).
///
/// Row 0 is the top of the image.
pub fn render_pixel(
    ctx: &RenderContext,
    config: &RenderConfig,
    x: u32,
    y: u32,
    rng: &mut Random,
) -> Color {
    let width = config.width as f32;
    let height = config.height as f32;
    let mut color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let u = (x as f32 + rng.uniform_f32()) / width;
        let v = 1.0 - (y as f32 + rng.uniform_f32()) / height;

        let ray = ctx.camera.generate_ray(u, v, rng);
        color += match ctx.scene.closest_intersect(&ray) {
            Some(hit) => illuminance(&hit, config.max_depth, ctx, rng),
            None => ctx.environment_radiance(ray.direction),
        };
    }

    color / config.samples_per_pixel.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_strips_exact_fit() {
        let strips = generate_strips(100, 50, 10);
        assert_eq!(strips.len(), 10);
        assert!(strips.iter().all(|s| s.width == 10 && s.height == 50));

        // Total pixels should equal image size
        let total: u32 = strips.iter().map(|s| s.pixel_count()).sum();
        assert_eq!(total, 100 * 50);
    }

    #[test]
    fn test_generate_strips_partial_fit() {
        let strips = generate_strips(103, 7, 10);
        assert_eq!(strips.len(), 10);

        // Contiguous and non-overlapping
        let mut next = 0;
        for (i, strip) in strips.iter().enumerate() {
            assert_eq!(strip.index, i);
            assert_eq!(strip.x, next);
            next += strip.width;
        }
        assert_eq!(next, 103);
        assert_eq!(strips[0].width, 11);
        assert_eq!(strips[9].width, 10);
    }

    #[test]
    fn test_generate_strips_clamps_count() {
        assert_eq!(generate_strips(4, 4, 10).len(), 4);
        assert_eq!(generate_strips(4, 4, 0).len(), 1);
        assert!(generate_strips(0, 4, 10).is_empty());
    }

    #[test]
    fn test_progress_counts_columns() {
        let progress = Progress::new(20);
        for _ in 0..20 {
            progress.column_done();
        }
        assert_eq!(progress.completed(), 20);
    }
}
