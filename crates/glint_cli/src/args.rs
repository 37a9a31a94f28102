//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glint_renderer::{FilterKind, RenderConfig};

/// Built-in scenes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Closed box with coloured walls and an area light
    #[default]
    Cornell,
    /// Random field of spheres under the sky
    Spheres,
    /// OBJ mesh standing in the box (needs --obj)
    Mesh,
}

/// Post filter choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Denoise {
    /// 3x3 per-channel median
    Median,
    /// 3x3 gaussian blur
    Gaussian,
}

impl From<Denoise> for FilterKind {
    fn from(denoise: Denoise) -> Self {
        match denoise {
            Denoise::Median => FilterKind::Median,
            Denoise::Gaussian => FilterKind::Gaussian,
        }
    }
}

// Render settings stay `None` unless given so they can override a config file.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "glint",
    version,
    about = "Monte-Carlo path tracer with BVH meshes and environment lighting",
    after_help = "EXAMPLES:\n  \
                  glint --scene cornell --spp 256 -o cornell.png\n  \
                  glint --scene mesh --obj bunny.obj --env sky.hdr --denoise median\n  \
                  glint --config render.json --threads 4"
)]
pub struct CliArgs {
    /// Built-in scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::Cornell)]
    pub scene: SceneKind,

    /// OBJ file for the mesh scene
    #[arg(long)]
    pub obj: Option<PathBuf>,

    /// Equirectangular HDR environment map
    #[arg(long)]
    pub env: Option<PathBuf>,

    /// JSON render configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    pub spp: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Worker threads, one image strip each
    #[arg(long)]
    pub threads: Option<usize>,

    /// Fixed random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Post filter applied after rendering
    #[arg(long, value_enum)]
    pub denoise: Option<Denoise>,

    /// Missed rays return black
    #[arg(long)]
    pub no_env_light: bool,

    /// Output PNG
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,
}

impl CliArgs {
    /// Load the config file if one was given, then apply flag overrides.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => RenderConfig::default(),
        };

        Ok(self.apply(config))
    }

    fn apply(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(spp) = self.spp {
            config.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(denoise) = self.denoise {
            config = config.with_denoise(Some(denoise.into()));
        }
        if self.no_env_light {
            config.use_environment_light = false;
        }
        config
    }
}
