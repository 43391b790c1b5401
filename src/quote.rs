//! The quote record every extractor produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An attributed quote: body text plus author.
///
/// Both fields are trimmed and non-empty. There is no way to build a
/// `QuoteModel` that violates this: [`QuoteModel::new`] returns `None`
/// instead, and extractors skip the offending line or row.
///
/// # Example
/// ```rust
/// use quote_meme::QuoteModel;
///
/// let q = QuoteModel::new("  To be or not to be ", "Shakespeare").unwrap();
/// assert_eq!(q.body(), "To be or not to be");
/// assert_eq!(q.to_string(), "\"To be or not to be\" - Shakespeare");
/// assert!(QuoteModel::new("   ", "Nobody").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQuote")]
pub struct QuoteModel {
    body: String,
    author: String,
}

impl QuoteModel {
    /// Build a quote from untrimmed parts. Returns `None` if either part is
    /// blank after trimming.
    pub fn new(body: impl AsRef<str>, author: impl AsRef<str>) -> Option<Self> {
        let body = body.as_ref().trim();
        let author = author.as_ref().trim();
        if body.is_empty() || author.is_empty() {
            return None;
        }
        Some(Self {
            body: body.to_string(),
            author: author.to_string(),
        })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

impl fmt::Display for QuoteModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.body, self.author)
    }
}

#[derive(Deserialize)]
struct RawQuote {
    body: String,
    author: String,
}

impl TryFrom<RawQuote> for QuoteModel {
    type Error = String;

    fn try_from(raw: RawQuote) -> Result<Self, Self::Error> {
        QuoteModel::new(&raw.body, &raw.author)
            .ok_or_else(|| "quote body and author must both be non-empty".to_string())
    }
}
