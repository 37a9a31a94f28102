//! Render errors and PNG encoding of finished images.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while rendering or writing an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Write an 8-bit RGB, row-major, top-to-bottom buffer as PNG.
pub fn save_png<P: AsRef<Path>>(path: P, pixels: &[u8], width: u32, height: u32) -> RenderResult<()> {
    let path = path.as_ref();
    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(RenderError::InvalidConfig(format!(
            "pixel buffer holds {} bytes, {}x{} RGB needs {}",
            pixels.len(),
            width,
            height,
            expected
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    image::save_buffer(path, pixels, width, height, image::ColorType::Rgb8)?;
    log::info!("Wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}
