//! Image source resolution: normalise a user-supplied path or URL to a local file.
//!
//! Remote images are downloaded into a `TempDir` owned by the returned
//! [`ResolvedImage`], so the copy disappears once rendering is done, even if
//! rendering fails. Downloaded bytes are sniffed before they are written; a
//! URL that serves HTML instead of an image fails here rather than deep inside
//! the decoder.

use crate::error::MemeError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved image: either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedImage {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; image downloaded to a temp directory.
    /// The `TempDir` is kept alive until rendering completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedImage {
    /// Get the path to the image regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedImage::Local(p) => p,
            ResolvedImage::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local image path, downloading URLs.
pub async fn resolve_image(input: &str, timeout_secs: u64) -> Result<ResolvedImage, MemeError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Resolve a local file path, validating that it exists and is readable.
fn resolve_local(path_str: &str) -> Result<ResolvedImage, MemeError> {
    let path = PathBuf::from(path_str);

    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(MemeError::ImageLoadFailure {
                path,
                detail: "not a regular file".into(),
            })
        }
        Err(e) => {
            return Err(MemeError::ImageLoadFailure {
                path,
                detail: e.to_string(),
            })
        }
    }

    debug!("Resolved local image: {}", path.display());
    Ok(ResolvedImage::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedImage, MemeError> {
    info!("Downloading image from: {}", url);

    let failed = |reason: String| MemeError::ImageDownloadFailure {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            failed(format!("timed out after {timeout_secs}s"))
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let filename = extract_filename(url);

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

    if let Err(e) = image::guess_format(&bytes) {
        return Err(MemeError::ImageLoadFailure {
            path: PathBuf::from(url),
            detail: format!("downloaded content is not a supported image: {e}"),
        });
    }

    let temp_dir = TempDir::new().map_err(|e| MemeError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| MemeError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());

    Ok(ResolvedImage::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded-image".to_string()
}
