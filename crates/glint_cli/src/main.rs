use anyhow::Result;
use clap::Parser;
use glint_core::Environment;
use glint_renderer::{render_to_file, RenderContext};
use std::time::Instant;

mod args;
mod scenes;

use args::CliArgs;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = CliArgs::parse();

    let config = args.render_config()?;
    let built = scenes::build(args.scene, args.obj.as_deref(), config.width, config.height)?;

    let mut environment = Environment::default();
    if let Some(path) = &args.env {
        match environment.load_map(path) {
            Ok(()) => log::info!("Loaded environment map {}", path.display()),
            // Keep rendering with the sky gradient
            Err(e) => log::warn!("{}; falling back to the sky gradient", e),
        }
    }

    let ctx = RenderContext::new(
        built.camera,
        built.scene,
        environment,
        config.use_environment_light,
    );

    let start = Instant::now();
    render_to_file(&ctx, &config, &args.output)?;
    log::info!(
        "Rendered {} in {} ms",
        args.output.display(),
        start.elapsed().as_millis()
    );

    Ok(())
}
