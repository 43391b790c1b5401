//! Tabular quote files with a header row.
//!
//! Two header conventions are recognised, case-insensitively: `body,author`
//! and `quote,speaker`. The convention is chosen once from the header and
//! applied to every row; column order and extra columns do not matter.
//! A header that pairs names from different conventions (`body,speaker`) is
//! rejected like a header with neither.

use super::{ensure_supported, Ingest};
use crate::error::MemeError;
use crate::quote::QuoteModel;
use ::csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::debug;

/// Recognised `(body column, author column)` header pairs, in priority order.
const HEADER_CONVENTIONS: &[(&str, &str)] = &[("body", "author"), ("quote", "speaker")];

/// Extractor for `.csv` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvIngestor;

/// Column indices resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    body: usize,
    author: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{FEFF}').trim().to_lowercase())
            .collect();
        let position = |wanted: &str| names.iter().position(|n| n == wanted);

        HEADER_CONVENTIONS.iter().find_map(|&(body, author)| {
            Some(ColumnMap {
                body: position(body)?,
                author: position(author)?,
            })
        })
    }

    fn quote(&self, row: &StringRecord) -> Option<QuoteModel> {
        QuoteModel::new(row.get(self.body)?, row.get(self.author)?)
    }
}

impl Ingest for CsvIngestor {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    fn parse(&self, path: &Path) -> Result<Vec<QuoteModel>, MemeError> {
        ensure_supported(self, path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| table_error(path, e))?;

        let headers = reader.headers().map_err(|e| table_error(path, e))?.clone();
        let columns = ColumnMap::from_headers(&headers).ok_or_else(|| MemeError::MalformedTable {
            path: path.to_path_buf(),
            detail: format!(
                "header {:?} has neither body/author nor quote/speaker columns",
                headers.iter().collect::<Vec<_>>()
            ),
        })?;
        debug!("{}: using columns {:?}", path.display(), columns);

        let mut quotes = Vec::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let row = record.map_err(|e| table_error(path, e))?;
            match columns.quote(&row) {
                Some(q) => quotes.push(q),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} incomplete rows in {}", skipped, path.display());
        }
        Ok(quotes)
    }
}

fn table_error(path: &Path, err: ::csv::Error) -> MemeError {
    let detail = err.to_string();
    match err.into_kind() {
        ErrorKind::Io(source) => MemeError::ReadFailed {
            path: path.to_path_buf(),
            source,
        },
        _ => MemeError::MalformedTable {
            path: path.to_path_buf(),
            detail,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn body_author_header() {
        let (_dir, path) = write_csv("body,author\nChase the sun.,Unknown\nRun free.,Unknown\n");
        let quotes = CsvIngestor.parse(&path).unwrap();
        assert_eq!(
            quotes,
            vec![
                QuoteModel::new("Chase the sun.", "Unknown").unwrap(),
                QuoteModel::new("Run free.", "Unknown").unwrap(),
            ]
        );
    }

    #[test]
    fn quote_speaker_header_any_case_and_order() {
        let (_dir, path) = write_csv("Speaker , QUOTE\nRex,\"Bark, bark.\"\n");
        let quotes = CsvIngestor.parse(&path).unwrap();
        assert_eq!(quotes, vec![QuoteModel::new("Bark, bark.", "Rex").unwrap()]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let (_dir, path) = write_csv("id,body,year,author\n1,Stay.,2020,Fido\n");
        let quotes = CsvIngestor.parse(&path).unwrap();
        assert_eq!(quotes, vec![QuoteModel::new("Stay.", "Fido").unwrap()]);
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let (_dir, path) = write_csv("body,author\nNo author here,\n,No body\nShort row\nGood.,Dog\n");
        let quotes = CsvIngestor.parse(&path).unwrap();
        assert_eq!(quotes, vec![QuoteModel::new("Good.", "Dog").unwrap()]);
    }

    #[test]
    fn unknown_header_is_malformed() {
        let (_dir, path) = write_csv("text,who\nHello,World\n");
        let err = CsvIngestor.parse(&path).unwrap_err();
        assert!(matches!(err, MemeError::MalformedTable { .. }), "got {err:?}");
    }

    #[test]
    fn mixed_conventions_are_malformed() {
        let (_dir, path) = write_csv("body,speaker\nHello,World\n");
        let err = CsvIngestor.parse(&path).unwrap_err();
        assert!(matches!(err, MemeError::MalformedTable { .. }), "got {err:?}");
    }

    #[test]
    fn empty_file_is_malformed() {
        let (_dir, path) = write_csv("");
        assert!(matches!(
            CsvIngestor.parse(&path),
            Err(MemeError::MalformedTable { .. })
        ));
    }

    #[test]
    fn header_only_yields_nothing() {
        let (_dir, path) = write_csv("body,author\n");
        assert!(CsvIngestor.parse(&path).unwrap().is_empty());
    }
}
