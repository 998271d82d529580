#![forbid(unsafe_code)]

//! Text measurement used to auto-size alerts.
//!
//! Real glyph metrics belong to the host platform. [`ApproxMeasure`] gives a
//! deterministic estimate from display columns: every column advances by a
//! fixed fraction of the font size, and text wraps greedily at word
//! boundaries.

use popkit_core::geometry::Size;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// A font description.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub size: f64,
    pub bold: bool,
}

impl Font {
    /// Regular weight.
    pub const fn regular(size: f64) -> Self {
        Self { size, bold: false }
    }

    /// Bold weight.
    pub const fn bold(size: f64) -> Self {
        Self { size, bold: true }
    }

    #[inline]
    pub fn line_height(self) -> f64 {
        self.size * LINE_HEIGHT_FACTOR
    }
}

/// Measures the bounding box of wrapped text.
pub trait TextMeasure {
    /// Size of `text` wrapped to `max_width`.
    fn measure(&self, text: &str, font: Font, max_width: f64) -> Size;
}

/// Column-based estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl ApproxMeasure {
    fn advance(font: Font) -> f64 {
        font.size * if font.bold { 0.55 } else { 0.5 }
    }

    /// Wrap `text` into lines no wider than `max_width`.
    pub fn wrap(&self, text: &str, font: Font, max_width: f64) -> Vec<String> {
        let advance = Self::advance(font);
        let max_cols = if advance > 0.0 {
            ((max_width / advance).floor() as usize).max(1)
        } else {
            usize::MAX
        };
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            wrap_paragraph(paragraph, max_cols, &mut lines);
        }
        lines
    }
}

fn wrap_paragraph(paragraph: &str, max_cols: usize, lines: &mut Vec<String>) {
    let mut line = String::new();
    let mut cols = 0usize;
    for word in paragraph.split_word_bounds() {
        let w = word.width();
        if cols + w > max_cols && cols > 0 {
            lines.push(line.trim_end().to_string());
            line.clear();
            cols = 0;
            if word.trim().is_empty() {
                continue;
            }
        }
        if w > max_cols {
            for g in word.graphemes(true) {
                let gw = g.width();
                if cols + gw > max_cols && cols > 0 {
                    lines.push(std::mem::take(&mut line));
                    cols = 0;
                }
                line.push_str(g);
                cols += gw;
            }
        } else {
            line.push_str(word);
            cols += w;
        }
    }
    lines.push(line.trim_end().to_string());
}

impl TextMeasure for ApproxMeasure {
    fn measure(&self, text: &str, font: Font, max_width: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let lines = self.wrap(text, font, max_width);
        let widest = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        Size::new(
            (widest as f64 * Self::advance(font)).min(max_width.max(0.0)),
            lines.len() as f64 * font.line_height(),
        )
    }
}
