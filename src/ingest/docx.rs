//! Word-processor quote files (`.docx`).
//!
//! A DOCX file is a ZIP archive; the body text lives in `word/document.xml`.
//! We walk that part with a streaming XML reader, gather the text runs of each
//! `w:p` paragraph and feed every paragraph through the same line convention
//! as plain-text files. Styling, tables and headers/footers are ignored.

use super::line::parse_quote_lines;
use super::{ensure_supported, Ingest};
use crate::error::MemeError;
use crate::quote::QuoteModel;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extractor for `.docx` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxIngestor;

impl Ingest for DocxIngestor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn parse(&self, path: &Path) -> Result<Vec<QuoteModel>, MemeError> {
        ensure_supported(self, path)?;

        let xml = read_document_part(path)?;
        let paragraphs = paragraph_texts(&xml).map_err(|detail| MemeError::MalformedDocument {
            path: path.to_path_buf(),
            detail,
        })?;
        debug!("{}: {} paragraphs", path.display(), paragraphs.len());

        let (quotes, skipped) = parse_quote_lines(paragraphs.iter().map(String::as_str));
        if skipped > 0 {
            debug!(
                "Skipped {} non-conforming paragraphs in {}",
                skipped,
                path.display()
            );
        }
        Ok(quotes)
    }
}

/// Read `word/document.xml` out of the archive at `path`.
fn read_document_part(path: &Path) -> Result<String, MemeError> {
    let file = File::open(path).map_err(|source| MemeError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let malformed = |detail: String| MemeError::MalformedDocument {
        path: path.to_path_buf(),
        detail,
    };

    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| malformed(format!("Failed to open DOCX archive: {e}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| malformed(format!("Missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| malformed(format!("Failed to read {DOCUMENT_PART}: {e}")))?;
    Ok(xml)
}

/// Plain text of every `w:p` paragraph, in document order.
///
/// Only `w:t` text is kept; `w:tab` becomes a tab and `w:br`/`w:cr` a space,
/// so a soft line break never glues two words together.
pub fn paragraph_texts(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 0 {
                        current.clear();
                    }
                    depth += 1;
                }
                b"t" => in_text = depth > 0,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if depth > 0 => current.push('\t'),
                b"br" | b"cr" if depth > 0 => current.push(' '),
                b"p" if depth == 0 => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| format!("Bad text at byte {}: {e}", reader.buffer_position()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "XML error at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
        }
    }

    Ok(paragraphs)
}
