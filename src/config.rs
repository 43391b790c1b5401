//! Configuration types for quote ingestion and meme rendering.
//!
//! Ingestion has a single knob worth configuring (which external tool turns
//! PDFs into text), so [`IngestConfig`] is a plain struct. Rendering has more
//! (output directory, size cap, font, format, download timeout), so
//! [`RenderConfig`] is built through [`RenderConfigBuilder`] with validation
//! in `build()`, and callers only set what they care about.

use crate::error::MemeError;
use crate::ingest::ExtractionTool;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for [`crate::QuoteEngine`].
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// External command used by the PDF extractor.
    /// Default: [`ExtractionTool::detect`].
    pub extraction_tool: ExtractionTool,

    /// Parent directory for the PDF extractor's per-call scratch directory.
    /// Default: `None` (system temp dir).
    pub temp_dir: Option<PathBuf>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extraction_tool: ExtractionTool::detect(),
            temp_dir: None,
        }
    }
}

/// Settings for [`crate::MemeEngine`].
///
/// # Example
/// ```rust
/// use quote_meme::{OutputFormat, RenderConfig};
///
/// let config = RenderConfig::builder()
///     .output_dir("./memes")
///     .max_width(640)
///     .output_format(OutputFormat::Png)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_width, Some(640));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Directory that receives rendered images; created on demand.
    /// Default: `./static`.
    pub output_dir: PathBuf,

    /// Images wider than this are scaled down, preserving aspect ratio.
    /// `None` keeps the original size. Default: 500.
    pub max_width: Option<u32>,

    /// TrueType/OpenType font used for the text. `None` searches common
    /// system font locations.
    pub font_path: Option<PathBuf>,

    /// Encoding of the rendered file. Default: JPEG.
    pub output_format: OutputFormat,

    /// Timeout for downloading remote images, in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Horizontal padding kept free on each side of the text, in pixels. Default: 20.
    pub padding: u32,

    /// Largest font size tried when fitting text. Default: 40.
    pub max_font_size: u32,

    /// Smallest font size the fitter shrinks to. Default: 10.
    pub min_font_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./static"),
            max_width: Some(500),
            font_path: None,
            output_format: OutputFormat::default(),
            download_timeout_secs: 30,
            padding: 20,
            max_font_size: 40,
            min_font_size: 10,
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn max_width(mut self, px: u32) -> Self {
        self.config.max_width = Some(px);
        self
    }

    /// Keep images at their original width.
    pub fn no_max_width(mut self) -> Self {
        self.config.max_width = None;
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn padding(mut self, px: u32) -> Self {
        self.config.padding = px;
        self
    }

    pub fn font_size_range(mut self, min: u32, max: u32) -> Self {
        self.config.min_font_size = min;
        self.config.max_font_size = max;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, MemeError> {
        let c = &self.config;
        if c.max_width == Some(0) {
            return Err(MemeError::InvalidConfig(
                "max_width must be at least 1 pixel".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(MemeError::InvalidConfig(
                "download timeout must be ≥ 1 second".into(),
            ));
        }
        if c.min_font_size == 0 || c.min_font_size > c.max_font_size {
            return Err(MemeError::InvalidConfig(format!(
                "font size range {}–{} is invalid",
                c.min_font_size, c.max_font_size
            )));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(MemeError::InvalidConfig(
                "output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Image encoding for rendered memes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// `.jpg` (default). Alpha is flattened.
    #[default]
    Jpeg,
    /// `.png`, lossless.
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub(crate) fn image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Png => image::ImageFormat::Png,
        }
    }
}
