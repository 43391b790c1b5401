//! Meme rendering: a quote drawn over an image.
//!
//! ```text
//! image path / URL ──▶ source::resolve_image ──▶ local file
//!                                                   │
//! QuoteModel ──────────────────────────────────────▶ render::compose (spawn_blocking)
//!                                                   │   decode → downscale → layout → draw
//!                                                   ▼
//!                                       <output_dir>/meme_<uuid>.<ext>
//! ```

pub mod font;
pub mod layout;
pub mod render;
pub mod source;

use crate::config::RenderConfig;
use crate::error::MemeError;
use crate::quote::QuoteModel;
use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Renders quotes onto images and writes the results to the output directory.
///
/// The font is loaded once at construction and shared across renders, so a
/// single engine can serve many concurrent `make_meme` calls.
///
/// # Example
/// ```rust,no_run
/// use quote_meme::{MemeEngine, QuoteModel, RenderConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let engine = MemeEngine::new(RenderConfig::default())?;
///     let quote = QuoteModel::new("Bark like no one is listening", "Rex").unwrap();
///     let path = engine.make_meme("./_data/photos/dog/xander_1.jpg", &quote).await?;
///     println!("{}", path.display());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MemeEngine {
    config: RenderConfig,
    font: Arc<FontVec>,
}

impl std::fmt::Debug for MemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MemeEngine {
    /// Create an engine, loading the font named in `config` or a system font.
    pub fn new(config: RenderConfig) -> Result<Self, MemeError> {
        let font = font::load_font(config.font_path.as_deref())?;
        Ok(Self {
            config,
            font: Arc::new(font),
        })
    }

    /// Create an engine from in-memory font data.
    pub fn with_font_bytes(config: RenderConfig, bytes: Vec<u8>) -> Result<Self, MemeError> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| MemeError::FontUnavailable {
            searched: Vec::new(),
        })?;
        Ok(Self {
            config,
            font: Arc::new(font),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `quote` over `image` (a local path or an http(s) URL).
    ///
    /// Returns the path of the newly written file inside
    /// [`RenderConfig::output_dir`]. Every call writes a fresh, uniquely named
    /// file; the source image is never modified.
    pub async fn make_meme(
        &self,
        image: impl AsRef<str>,
        quote: &QuoteModel,
    ) -> Result<PathBuf, MemeError> {
        let image = image.as_ref();
        let resolved = source::resolve_image(image, self.config.download_timeout_secs).await?;

        let out_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|e| MemeError::OutputWriteFailed {
                path: out_dir.clone(),
                source: e,
            })?;
        let out_path = output_path(out_dir, &self.config);

        debug!("Rendering '{}' onto {}", quote, resolved.path().display());

        let src = resolved.path().to_path_buf();
        let quote_owned = quote.clone();
        let font = Arc::clone(&self.font);
        let config = self.config.clone();
        let dest = out_path.clone();

        tokio::task::spawn_blocking(move || {
            render::compose(&src, &quote_owned, &*font, &config, &dest)
        })
        .await
        .map_err(|e| MemeError::Internal(format!("render task failed: {e}")))??;

        // Downloaded sources are removed only once rendering has finished.
        drop(resolved);

        info!("Wrote {}", out_path.display());
        Ok(out_path)
    }

    /// Synchronous wrapper around [`MemeEngine::make_meme`].
    ///
    /// Creates a temporary tokio runtime internally.
    pub fn make_meme_sync(
        &self,
        image: impl AsRef<str>,
        quote: &QuoteModel,
    ) -> Result<PathBuf, MemeError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| MemeError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.make_meme(image, quote))
    }
}

fn output_path(dir: &Path, config: &RenderConfig) -> PathBuf {
    dir.join(format!(
        "meme_{}.{}",
        Uuid::now_v7().simple(),
        config.output_format.extension()
    ))
}
