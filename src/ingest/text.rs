//! Plain-text quote files: one `"<body>" - <author>` quote per line.

use super::line::parse_quote_lines;
use super::{ensure_supported, Ingest};
use crate::error::MemeError;
use crate::quote::QuoteModel;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: char = '\u{FEFF}';

/// Extractor for `.txt` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextIngestor;

impl Ingest for TextIngestor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["txt"]
    }

    fn parse(&self, path: &Path) -> Result<Vec<QuoteModel>, MemeError> {
        ensure_supported(self, path)?;

        let content = std::fs::read_to_string(path).map_err(|source| MemeError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

        let (quotes, skipped) = parse_quote_lines(content.lines());
        if skipped > 0 {
            debug!(
                "Skipped {} non-conforming lines in {}",
                skipped,
                path.display()
            );
        }
        Ok(quotes)
    }
}
