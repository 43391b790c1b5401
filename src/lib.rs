//! # quote-meme
//!
//! Harvest quotes from documents and render them as captions over images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! quote files (.txt .csv .docx .pdf)          images (local path or URL)
//!  │                                            │
//!  ├─ 1. Ingest   QuoteEngine picks the         │
//!  │              extractor by extension        │
//!  ├─ 2. Collect  Vec<QuoteModel>               │
//!  ├─ 3. Select   random (optionally seeded) ───┤
//!  │              or caller-supplied            │
//!  └──────────────────────────────────────────▶ 4. Render  MemeEngine
//!                                                  decode → downscale → wrap → draw
//!                                               5. Output  <output_dir>/meme_<uuid>.jpg
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quote_meme::{MemeEngine, QuoteEngine, RenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let quotes = QuoteEngine::default().parse("./_data/DogQuotes/DogQuotesTXT.txt")?;
//!     let engine = MemeEngine::new(RenderConfig::default())?;
//!     let path = engine.make_meme("./_data/photos/dog/xander_1.jpg", &quotes[0]).await?;
//!     println!("{}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `meme` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! quote-meme = { version = "0.1", default-features = false }
//! ```
//!
//! ## External Tools
//!
//! PDF ingestion shells out to `pdftotext` (poppler-utils) or `mutool`
//! (MuPDF); see [`ExtractionTool`]. Rendering needs a TrueType font, found
//! in the usual system locations unless [`RenderConfig::font_path`] is set.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod meme;
pub mod quote;
pub mod select;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{IngestConfig, OutputFormat, RenderConfig, RenderConfigBuilder};
pub use error::MemeError;
pub use ingest::{
    supported_extensions, CsvIngestor, DocxIngestor, ExtractionTool, Ingest, Ingestor,
    PdfIngestor, QuoteEngine, TextIngestor,
};
pub use meme::MemeEngine;
pub use quote::QuoteModel;
