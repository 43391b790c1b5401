//! Text layout: wrap the quote to the image width and pick a font size.
//!
//! The fitter starts at `min(max_font_size, height / 10)` and shrinks by 2 px
//! until the wrapped body and author take less than half the image height,
//! or the minimum size is reached. The finished block is centred on a line
//! 60 % of the way down, which keeps the text clear of faces in most photos.

use crate::config::RenderConfig;
use crate::quote::QuoteModel;
use ab_glyph::{Font, PxScale};
use imageproc::drawing::text_size;

/// Vertical gap between consecutive lines, in pixels.
pub const LINE_GAP: u32 = 4;

/// Fraction of the image height the text block may occupy.
const MAX_BLOCK_FRACTION: f32 = 0.5;

/// Vertical centre of the text block, as a fraction of the image height.
const BLOCK_CENTRE: f32 = 0.6;

const FONT_STEP: u32 = 2;

/// A laid-out text block ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Body lines, an empty spacer line, then author lines.
    pub lines: Vec<String>,
    pub font_size: u32,
    pub line_height: u32,
    /// Top of the first line.
    pub top: i32,
}

impl TextBlock {
    pub fn line_step(&self) -> u32 {
        self.line_height + LINE_GAP
    }
}

/// Greedy word wrap: add words to the current line while `measure` says it
/// still fits within `max_width`. A single word wider than the limit gets a
/// line to itself rather than being split.
pub fn wrap_words<M>(text: &str, max_width: u32, measure: M) -> Vec<String>
where
    M: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// The two strings drawn for a quote: the body in quote marks, and the
/// author with an attribution dash.
pub fn caption_lines(quote: &QuoteModel) -> (String, String) {
    (format!("\"{}\"", quote.body()), format!("- {}", quote.author()))
}

/// Lay out `quote` on a `width` × `height` image.
pub fn fit_text(
    font: &impl Font,
    quote: &QuoteModel,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> TextBlock {
    let (body, author) = caption_lines(quote);
    let max_text_width = width.saturating_sub(2 * config.padding).max(1);

    let mut font_size = (height / 10).clamp(config.min_font_size, config.max_font_size);

    loop {
        let scale = PxScale::from(font_size as f32);
        let measure = |s: &str| text_size(scale, font, s).0;

        let body_lines = wrap_words(&body, max_text_width, measure);
        let author_lines = wrap_words(&author, max_text_width, measure);
        let line_height = text_size(scale, font, "Ay").1.max(1);

        let needed = (body_lines.len() + author_lines.len()) as u32 * (line_height + LINE_GAP);
        let fits = (needed as f32) < height as f32 * MAX_BLOCK_FRACTION;

        if fits || font_size <= config.min_font_size {
            let mut lines = body_lines;
            lines.push(String::new());
            lines.extend(author_lines);
            let top = block_top(lines.len(), line_height, height);
            return TextBlock {
                lines,
                font_size,
                line_height,
                top,
            };
        }

        font_size = font_size
            .saturating_sub(FONT_STEP)
            .max(config.min_font_size);
    }
}

fn block_top(line_count: usize, line_height: u32, height: u32) -> i32 {
    let total = line_count as f32 * (line_height + LINE_GAP) as f32;
    (height as f32 * BLOCK_CENTRE - total / 2.0).max(0.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten pixels per character, a stand-in for real glyph metrics.
    fn mono(s: &str) -> u32 {
        s.chars().count() as u32 * 10
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_words("Run free.", 200, mono), vec!["Run free."]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_words("Chase the sun every single day", 120, mono);
        assert_eq!(lines, vec!["Chase the", "sun every", "single day"]);
        assert!(lines.iter().all(|l| mono(l) <= 120));
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = wrap_words("a supercalifragilistic b", 50, mono);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn collapses_whitespace_and_handles_empty() {
        assert_eq!(wrap_words("  one \n two  ", 500, mono), vec!["one two"]);
        assert!(wrap_words("   ", 500, mono).is_empty());
    }

    #[test]
    fn caption_adds_quote_marks_and_dash() {
        let q = QuoteModel::new("Stay motivated!", "Speaker").unwrap();
        let (body, author) = caption_lines(&q);
        assert_eq!(body, "\"Stay motivated!\"");
        assert_eq!(author, "- Speaker");
    }

    #[test]
    fn block_is_centred_low_and_never_negative() {
        assert_eq!(block_top(3, 16, 400), 240 - 30);
        assert_eq!(block_top(100, 40, 100), 0);
    }

    #[test]
    fn fit_text_with_system_font() {
        let Some(path) = crate::meme::font::find_system_font() else {
            println!("SKIP — no system font installed");
            return;
        };
        let font = crate::meme::font::load_font(Some(&path)).unwrap();
        let config = RenderConfig::default();
        let q = QuoteModel::new(
            "Chase the sun, run with the wind and never stop believing in tomorrow",
            "Unknown",
        )
        .unwrap();

        let block = fit_text(&font, &q, 300, 200, &config);
        assert!(block.font_size >= config.min_font_size);
        assert!(block.font_size <= 20, "200px tall image starts at 20px");
        assert!(block.lines.iter().any(|l| l.is_empty()), "spacer line");
        assert_eq!(block.lines.last().unwrap(), "- Unknown");
        for line in &block.lines {
            let w = text_size(PxScale::from(block.font_size as f32), &font, line).0;
            let single_word = !line.contains(' ');
            assert!(w <= 260 || single_word, "{line:?} is {w}px wide");
        }
    }
}
