//! Compositing: decode, downscale, draw the caption, encode.
//!
//! Everything here is CPU-bound and synchronous; [`super::MemeEngine`] runs
//! it on the blocking thread pool.

use super::layout::{fit_text, TextBlock};
use crate::config::{OutputFormat, RenderConfig};
use crate::error::MemeError;
use crate::quote::QuoteModel;
use ab_glyph::{Font, PxScale};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;
use tracing::debug;

const FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Render `quote` onto the image at `source` and write it to `output`.
pub fn compose(
    source: &Path,
    quote: &QuoteModel,
    font: &impl Font,
    config: &RenderConfig,
    output: &Path,
) -> Result<(), MemeError> {
    let img = load_image(source)?;
    let img = downscale(img, config.max_width);
    let mut canvas = img.to_rgba8();

    let block = fit_text(font, quote, canvas.width(), canvas.height(), config);
    debug!(
        "Layout: {} lines at {}px on {}x{}",
        block.lines.len(),
        block.font_size,
        canvas.width(),
        canvas.height()
    );
    draw_block(&mut canvas, &block, font);

    save_atomic(canvas, output, config.output_format)
}

/// Decode an image, sniffing the format from content rather than extension.
pub fn load_image(path: &Path) -> Result<DynamicImage, MemeError> {
    let fail = |detail: String| MemeError::ImageLoadFailure {
        path: path.to_path_buf(),
        detail,
    };
    ImageReader::open(path)
        .map_err(|e| fail(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| fail(e.to_string()))?
        .decode()
        .map_err(|e| fail(e.to_string()))
}

/// Output dimensions for a `width` × `height` image capped at `max_width`,
/// preserving aspect ratio. Images are never enlarged.
pub fn target_size(width: u32, height: u32, max_width: Option<u32>) -> (u32, u32) {
    match max_width {
        Some(max) if width > max => {
            let ratio = max as f64 / width as f64;
            let h = (height as f64 * ratio).round() as u32;
            (max, h.max(1))
        }
        _ => (width, height),
    }
}

fn downscale(img: DynamicImage, max_width: Option<u32>) -> DynamicImage {
    let (w, h) = target_size(img.width(), img.height(), max_width);
    if (w, h) == (img.width(), img.height()) {
        img
    } else {
        debug!("Resizing {}x{} → {}x{}", img.width(), img.height(), w, h);
        img.resize_exact(w, h, FilterType::Lanczos3)
    }
}

/// Draw every line centred horizontally, white with a one-pixel black outline.
fn draw_block(canvas: &mut RgbaImage, block: &TextBlock, font: &impl Font) {
    let scale = PxScale::from(block.font_size as f32);
    let step = block.line_step() as i32;

    for (i, line) in block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (text_w, _) = text_size(scale, font, line);
        let x = (canvas.width() as i32 - text_w as i32) / 2;
        let y = block.top + i as i32 * step;

        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx != 0 || dy != 0 {
                    draw_text_mut(canvas, OUTLINE, x + dx, y + dy, scale, font, line);
                }
            }
        }
        draw_text_mut(canvas, FILL, x, y, scale, font, line);
    }
}

/// Encode to a sibling temp file, then rename into place, so a crash never
/// leaves a truncated image under the final name.
fn save_atomic(canvas: RgbaImage, output: &Path, format: OutputFormat) -> Result<(), MemeError> {
    let write_failed = |source: std::io::Error| MemeError::OutputWriteFailed {
        path: output.to_path_buf(),
        source,
    };

    let image = match format {
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
        OutputFormat::Png => DynamicImage::ImageRgba8(canvas),
    };

    let tmp_path = output.with_extension(format!("{}.tmp", format.extension()));
    image
        .save_with_format(&tmp_path, format.image_format())
        .map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            write_failed(into_io_error(e))
        })?;

    std::fs::rename(&tmp_path, output).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        write_failed(e)
    })
}

fn into_io_error(err: ImageError) -> std::io::Error {
    match err {
        ImageError::IoError(e) => e,
        other => std::io::Error::other(other),
    }
}
