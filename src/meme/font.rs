//! Font loading for the text overlay.

use crate::error::MemeError;
use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Common locations of a sans-serif TrueType font across Linux distributions,
/// macOS and Windows. First readable, parseable file wins.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the configured font, or the first usable system font.
pub fn load_font(explicit: Option<&Path>) -> Result<FontVec, MemeError> {
    if let Some(path) = explicit {
        return read_font(path).ok_or_else(|| MemeError::FontUnavailable {
            searched: vec![path.to_path_buf()],
        });
    }

    for candidate in SYSTEM_FONT_CANDIDATES {
        if let Some(font) = read_font(Path::new(candidate)) {
            return Ok(font);
        }
    }

    Err(MemeError::FontUnavailable {
        searched: SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
    })
}

/// First system font that exists on this machine, if any.
pub fn find_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| read_font(p).is_some())
}

fn read_font(path: &Path) -> Option<FontVec> {
    let bytes = std::fs::read(path).ok()?;
    match FontVec::try_from_vec(bytes) {
        Ok(font) => {
            debug!("Loaded font {}", path.display());
            Some(font)
        }
        Err(e) => {
            debug!("Ignoring unparseable font {}: {e}", path.display());
            None
        }
    }
}
