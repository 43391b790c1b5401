//! Quote ingestion: one extractor per file format behind a single facade.
//!
//! ## Data Flow
//!
//! ```text
//! path ──▶ QuoteEngine ──▶ Ingestor (by extension) ──▶ Vec<QuoteModel>
//!            │               ├─ text  (.txt)   line convention
//!            │               ├─ csv   (.csv)   header convention
//!            │               ├─ docx  (.docx)  paragraphs → line convention
//!            │               └─ pdf   (.pdf)   external tool → line convention
//!            └─ concatenates results across paths, in input order
//! ```
//!
//! Every extractor implements [`Ingest`]. The set of formats is fixed, so the
//! facade holds a closed [`Ingestor`] enum rather than trait objects.

pub mod csv;
pub mod docx;
pub mod line;
pub mod pdf;
pub mod text;

pub use self::csv::CsvIngestor;
pub use self::docx::DocxIngestor;
pub use self::pdf::{ExtractionTool, PdfIngestor};
pub use self::text::TextIngestor;

use crate::config::IngestConfig;
use crate::error::MemeError;
use crate::quote::QuoteModel;
use std::path::Path;
use tracing::{debug, info};

/// Capability contract shared by all format extractors.
pub trait Ingest {
    /// Short label used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Lower-case extensions (without the dot) this extractor accepts.
    fn extensions(&self) -> &'static [&'static str];

    /// Whether this extractor handles `path`. Looks at the extension only,
    /// case-insensitively; never touches the file.
    fn can_ingest(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }

    /// Extract every well-formed quote from `path`, in file order.
    ///
    /// # Errors
    /// [`MemeError::UnsupportedFormat`] when `can_ingest(path)` is false, plus
    /// whatever structural failure the format can hit.
    fn parse(&self, path: &Path) -> Result<Vec<QuoteModel>, MemeError>;
}

/// Lower-cased extension of `path`, if any.
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Guard used at the top of every `parse` implementation.
pub(crate) fn ensure_supported(ingestor: &impl Ingest, path: &Path) -> Result<(), MemeError> {
    if ingestor.can_ingest(path) {
        Ok(())
    } else {
        Err(MemeError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

/// The closed set of format extractors.
#[derive(Debug, Clone)]
pub enum Ingestor {
    Text(TextIngestor),
    Csv(CsvIngestor),
    Docx(DocxIngestor),
    Pdf(PdfIngestor),
}

impl Ingest for Ingestor {
    fn name(&self) -> &'static str {
        match self {
            Ingestor::Text(i) => i.name(),
            Ingestor::Csv(i) => i.name(),
            Ingestor::Docx(i) => i.name(),
            Ingestor::Pdf(i) => i.name(),
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self {
            Ingestor::Text(i) => i.extensions(),
            Ingestor::Csv(i) => i.extensions(),
            Ingestor::Docx(i) => i.extensions(),
            Ingestor::Pdf(i) => i.extensions(),
        }
    }

    fn parse(&self, path: &Path) -> Result<Vec<QuoteModel>, MemeError> {
        match self {
            Ingestor::Text(i) => i.parse(path),
            Ingestor::Csv(i) => i.parse(path),
            Ingestor::Docx(i) => i.parse(path),
            Ingestor::Pdf(i) => i.parse(path),
        }
    }
}

/// Facade that dispatches each quote file to the extractor for its extension.
///
/// # Example
/// ```rust,no_run
/// use quote_meme::QuoteEngine;
///
/// let engine = QuoteEngine::default();
/// let quotes = engine.parse_all(["quotes.txt", "quotes.csv"])?;
/// for q in &quotes {
///     println!("{q}");
/// }
/// # Ok::<(), quote_meme::MemeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    ingestors: Vec<Ingestor>,
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new(&IngestConfig::default())
    }
}

impl QuoteEngine {
    /// Build the engine with all four extractors.
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            ingestors: vec![
                Ingestor::Text(TextIngestor),
                Ingestor::Csv(CsvIngestor),
                Ingestor::Docx(DocxIngestor),
                Ingestor::Pdf(PdfIngestor::new(
                    config.extraction_tool.clone(),
                    config.temp_dir.clone(),
                )),
            ],
        }
    }

    /// Build an engine over an explicit extractor list.
    pub fn with_ingestors(ingestors: Vec<Ingestor>) -> Self {
        Self { ingestors }
    }

    pub fn ingestors(&self) -> &[Ingestor] {
        &self.ingestors
    }

    /// Whether any extractor accepts `path`.
    pub fn supports(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.ingestors.iter().any(|i| i.can_ingest(path))
    }

    /// Resolve the single extractor responsible for `path`.
    pub fn select(&self, path: &Path) -> Result<&Ingestor, MemeError> {
        let mut matching = self.ingestors.iter().filter(|i| i.can_ingest(path));
        let first = matching.next().ok_or_else(|| MemeError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let rest: Vec<&Ingestor> = matching.collect();
        if !rest.is_empty() {
            let candidates = std::iter::once(first)
                .chain(rest)
                .map(|i| i.name())
                .collect();
            return Err(MemeError::AmbiguousIngestor {
                path: path.to_path_buf(),
                candidates,
            });
        }
        Ok(first)
    }

    /// Parse one quote file.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<QuoteModel>, MemeError> {
        let path = path.as_ref();
        let ingestor = self.select(path)?;

        if !path.exists() {
            return Err(MemeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        debug!("Parsing {} with {} ingestor", path.display(), ingestor.name());
        let quotes = ingestor.parse(path)?;
        info!("Loaded {} quotes from {}", quotes.len(), path.display());
        Ok(quotes)
    }

    /// Parse several quote files and concatenate the results in input order.
    ///
    /// The first failing path aborts the call. Wrap paths individually (see
    /// [`crate::catalog::load_quotes`]) when partial results are acceptable.
    pub fn parse_all<I, P>(&self, paths: I) -> Result<Vec<QuoteModel>, MemeError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut all = Vec::new();
        for path in paths {
            all.extend(self.parse(path)?);
        }
        Ok(all)
    }
}

/// Every extension the built-in extractors accept.
pub fn supported_extensions() -> Vec<&'static str> {
    QuoteEngine::default()
        .ingestors
        .iter()
        .flat_map(|i| i.extensions().iter().copied())
        .collect()
}
