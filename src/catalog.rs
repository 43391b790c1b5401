//! Discovery of quote files and images inside a data directory.
//!
//! A data directory is just a tree of files: quote sources in any format the
//! [`QuoteEngine`] supports, and photos in any format the renderer decodes.
//! Walks are recursive and results are sorted, so a seeded random pick is
//! reproducible across machines.

use crate::error::MemeError;
use crate::ingest::{extension_of, QuoteEngine};
use crate::quote::QuoteModel;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Image extensions picked up by [`discover_images`].
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Every file under `dir` that `engine` can ingest, sorted by path.
pub fn discover_quote_files(dir: &Path, engine: &QuoteEngine) -> Result<Vec<PathBuf>, MemeError> {
    let mut files = walk(dir)?;
    files.retain(|p| engine.supports(p));
    debug!("Found {} quote files under {}", files.len(), dir.display());
    Ok(files)
}

/// Every image under `dir`, sorted by path.
///
/// Names containing `:` are skipped; they are usually macOS resource-fork
/// debris and unreadable on other systems.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, MemeError> {
    let mut files = walk(dir)?;
    files.retain(|p| {
        let clean_name = p
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| !n.contains(':'));
        clean_name && extension_of(p).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    });
    debug!("Found {} images under {}", files.len(), dir.display());
    Ok(files)
}

/// Parse every file in `paths`, skipping (and logging) files that fail.
///
/// Use [`QuoteEngine::parse_all`] instead when one bad file should abort.
pub fn load_quotes<I, P>(engine: &QuoteEngine, paths: I) -> Vec<QuoteModel>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut quotes = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match engine.parse(path) {
            Ok(found) => quotes.extend(found),
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
    }
    quotes
}

fn walk(dir: &Path) -> Result<Vec<PathBuf>, MemeError> {
    if !dir.is_dir() {
        return Err(MemeError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    // Symlinks are not followed, so a link back up the tree cannot loop.
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| MemeError::ReadFailed {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
