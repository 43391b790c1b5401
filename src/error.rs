//! Error types for the quote-meme library.
//!
//! Every failure that reaches a caller is a [`MemeError`]. The variants split
//! along the same line the pipeline does:
//!
//! * **Structural** failures: wrong extension, unreadable file, a table header
//!   with no recognised columns, a missing extraction tool, an image that cannot
//!   be decoded. These always propagate.
//!
//! * **Content** anomalies: one quote line without a separator, one CSV row
//!   with an empty cell. These never become errors: the extractor logs them at
//!   `debug` and moves on to the next line, so one bad line cannot sink an
//!   otherwise valid file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the quote-meme library.
#[derive(Debug, Error)]
pub enum MemeError {
    // ── Ingestion errors ──────────────────────────────────────────────────
    /// No extractor claims the file's extension.
    #[error("Unsupported quote file '{path}'\nSupported extensions: .txt, .csv, .docx, .pdf")]
    UnsupportedFormat { path: PathBuf },

    /// More than one extractor claims the same extension.
    #[error("Ambiguous ingestor configuration for '{path}': claimed by {candidates:?}")]
    AmbiguousIngestor {
        path: PathBuf,
        candidates: Vec<&'static str>,
    },

    /// Quote file was not found at the given path.
    #[error("Quote file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read (permissions, invalid UTF-8, …).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV header carries neither `body/author` nor `quote/speaker`,
    /// or the table could not be decoded.
    #[error("Malformed table '{path}': {detail}")]
    MalformedTable { path: PathBuf, detail: String },

    /// DOCX package could not be opened or its document part is invalid.
    #[error("Malformed document '{path}': {detail}")]
    MalformedDocument { path: PathBuf, detail: String },

    /// The external PDF text-extraction tool is missing or exited non-zero.
    #[error(
        "Text extraction with '{tool}' failed{}: {diagnostic}\n\
Install poppler-utils (pdftotext) or mupdf-tools (mutool), or pass --pdf-tool.",
        exit_suffix(.status)
    )]
    ExtractionToolFailure {
        tool: String,
        status: Option<i32>,
        diagnostic: String,
    },

    // ── Compositing errors ────────────────────────────────────────────────
    /// The source image is missing or cannot be decoded.
    #[error("Failed to load image '{path}': {detail}")]
    ImageLoadFailure { path: PathBuf, detail: String },

    /// A remote image could not be fetched.
    #[error("Failed to download image '{url}': {reason}\nCheck the URL and your internet connection.")]
    ImageDownloadFailure { url: String, reason: String },

    /// No TrueType font could be loaded for drawing text.
    #[error("No usable font found (searched: {searched:?})\nPass --font <path/to/font.ttf>.")]
    FontUnavailable { searched: Vec<PathBuf> },

    /// Could not create the output directory or write the rendered image.
    #[error("Failed to write output image '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" (exit status {code})"),
        None => String::new(),
    }
}
