//! The `"<body>" - <author>` line convention shared by the TXT, DOCX and PDF
//! extractors.
//!
//! A line is split on its **last** `" - "`; if that spaced separator is absent
//! the last bare `-` is used instead. Splitting on the last occurrence keeps
//! hyphens inside the body intact (`"Well-known words" - Someone`). Quote
//! marks (straight or curly) and spaces are then peeled off both ends of the
//! body.

use crate::quote::QuoteModel;

const SPACED_SEPARATOR: &str = " - ";
const BARE_SEPARATOR: char = '-';

/// Characters peeled off both ends of the body.
fn is_body_wrapper(c: char) -> bool {
    c == '"' || c == '\u{201C}' || c == '\u{201D}' || c.is_whitespace()
}

/// Parse one line into a quote, or `None` if it does not follow the
/// convention (blank, no separator, or an empty side after cleanup).
pub fn parse_quote_line(line: &str) -> Option<QuoteModel> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }

    let (body, author) = match text.rsplit_once(SPACED_SEPARATOR) {
        Some(parts) => parts,
        None => text.rsplit_once(BARE_SEPARATOR)?,
    };

    QuoteModel::new(body.trim_matches(is_body_wrapper), author)
}

/// Apply [`parse_quote_line`] to every line of `text`, keeping file order.
///
/// Non-conforming lines are skipped; the number skipped is returned alongside
/// the records so callers can log it.
pub fn parse_quote_lines<'a, I>(lines: I) -> (Vec<QuoteModel>, usize)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut quotes = Vec::new();
    let mut skipped = 0;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_quote_line(line) {
            Some(q) => quotes.push(q),
            None => skipped += 1,
        }
    }
    (quotes, skipped)
}
