use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ImageEncoder, RgbaImage};

use crate::error::{DoodleError, Result};

/// Decode a colouring page to RGBA8, shrinking it (never enlarging) so it
/// fits aspect-fit inside `max_width × max_height`.
pub fn import_background(path: &Path, max_width: u32, max_height: u32) -> Result<RgbaImage> {
    let img = image::open(path)
        .map_err(|e| DoodleError::Import { path: path.to_path_buf(), message: e.to_string() })?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let fitted = fit_within(img, max_width, max_height);
    log::info!(
        "imported background {} ({}x{} -> {}x{})",
        path.display(),
        w,
        h,
        fitted.width(),
        fitted.height()
    );
    Ok(fitted)
}

/// Downscale `img` with a triangle filter until it fits the bounds.
pub fn fit_within(img: RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if max_width == 0 || max_height == 0 || (w <= max_width && h <= max_height) {
        return img;
    }
    let scale = (max_width as f32 / w as f32).min(max_height as f32 / h as f32);
    let new_w = ((w as f32 * scale).round() as u32).clamp(1, max_width);
    let new_h = ((h as f32 * scale).round() as u32).clamp(1, max_height);
    imageops::resize(&img, new_w, new_h, FilterType::Triangle)
}

/// Write an RGBA image as PNG.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    log::info!("saved {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(())
}
