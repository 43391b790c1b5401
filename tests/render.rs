//! Integration tests for meme rendering.
//!
//! Rendering needs a TrueType font. These tests look for one in the usual
//! system locations (or `MEME_TEST_FONT`) and skip when none is installed.

use image::{Rgb, RgbImage};
use quote_meme::meme::font::find_system_font;
use quote_meme::{MemeEngine, MemeError, OutputFormat, QuoteModel, RenderConfig};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_font() -> Option<PathBuf> {
    std::env::var_os("MEME_TEST_FONT")
        .map(PathBuf::from)
        .or_else(find_system_font)
}

/// Skip this test when no font is available.
macro_rules! skip_without_font {
    () => {{
        match test_font() {
            Some(p) => p,
            None => {
                println!("SKIP — no TrueType font found; set MEME_TEST_FONT=/path/to/font.ttf");
                return;
            }
        }
    }};
}

fn write_photo(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]))
        .save(path)
        .unwrap();
}

fn engine(font: PathBuf, out: &Path, format: OutputFormat) -> MemeEngine {
    let config = RenderConfig::builder()
        .output_dir(out)
        .font_path(font)
        .output_format(format)
        .build()
        .unwrap();
    MemeEngine::new(config).unwrap()
}

fn stay_motivated() -> QuoteModel {
    QuoteModel::new("Stay motivated!", "Speaker").unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn renders_a_new_file_under_the_output_dir() {
    let font = skip_without_font!();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("dog.png");
    write_photo(&src, 800, 600);
    let before = std::fs::read(&src).unwrap();
    let out_dir = dir.path().join("static");

    let engine = engine(font, &out_dir, OutputFormat::Jpeg);
    let path = engine
        .make_meme(src.to_str().unwrap(), &stay_motivated())
        .await
        .unwrap();

    assert_ne!(path, src);
    assert!(path.starts_with(&out_dir), "{}", path.display());
    assert_eq!(path.extension().unwrap(), "jpg");
    assert_eq!(std::fs::read(&src).unwrap(), before, "source untouched");

    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (500, 375));
}

#[tokio::test]
async fn repeated_renders_never_overwrite() {
    let font = skip_without_font!();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("cat.png");
    write_photo(&src, 320, 240);

    let engine = engine(font, dir.path(), OutputFormat::Png);
    let a = engine.make_meme(src.to_str().unwrap(), &stay_motivated()).await.unwrap();
    let b = engine.make_meme(src.to_str().unwrap(), &stay_motivated()).await.unwrap();

    assert_ne!(a, b);
    assert!(a.exists() && b.exists());
    let img = image::open(&a).unwrap();
    assert_eq!((img.width(), img.height()), (320, 240), "small images keep their size");
}

#[test]
fn caption_changes_the_pixels() {
    let font = skip_without_font!();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("plain.png");
    RgbImage::from_pixel(400, 300, Rgb([60, 120, 180]))
        .save(&src)
        .unwrap();

    let engine = engine(font, dir.path(), OutputFormat::Png);
    let path = tokio_test::block_on(engine.make_meme(src.to_str().unwrap(), &stay_motivated()))
        .unwrap();

    let rendered = image::open(&path).unwrap().to_rgb8();
    let white = rendered.pixels().filter(|p| p.0.iter().all(|&c| c > 230)).count();
    let black = rendered.pixels().filter(|p| p.0.iter().all(|&c| c < 40)).count();
    assert!(white > 0, "no fill pixels drawn");
    assert!(black > 0, "no outline pixels drawn");
}

#[test]
fn sync_wrapper_reports_missing_image() {
    let font = skip_without_font!();
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(font, dir.path(), OutputFormat::Jpeg);

    let err = engine
        .make_meme_sync("/no/such/photo.jpg", &stay_motivated())
        .unwrap_err();
    assert!(matches!(err, MemeError::ImageLoadFailure { .. }), "got {err:?}");
}

#[test]
fn undecodable_image_is_a_load_failure() {
    let font = skip_without_font!();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("broken.jpg");
    std::fs::write(&src, b"\xff\xd8 truncated").unwrap();
    let out_dir = dir.path().join("out");

    let engine = engine(font, &out_dir, OutputFormat::Jpeg);
    let err = engine
        .make_meme_sync(src.to_str().unwrap(), &stay_motivated())
        .unwrap_err();
    assert!(matches!(err, MemeError::ImageLoadFailure { .. }), "got {err:?}");

    let leftovers = std::fs::read_dir(&out_dir).map(|d| d.count()).unwrap_or(0);
    assert_eq!(leftovers, 0, "no partial output");
}
