//! Text gauges: one fixed-width bar per core.

use crate::config::{EMPTY_GLYPH, FILLED_GLYPH};

/// One core's bar. Always exactly as many characters as the width it was
/// rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeLine {
    text: String,
    filled: usize,
}

impl GaugeLine {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of filled glyphs at the start of the bar
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Width in characters
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Number of filled cells for `percent` on a `width`-cell bar:
/// `floor(percent * width / 100)` clamped to `0..=width`.
///
/// Readings above 100% happen on transient spikes; they fill the bar and
/// stop there. Negative and NaN readings show as empty.
pub fn filled_cells(percent: f64, width: usize) -> usize {
    let raw = (percent * width as f64 / 100.0).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= width as f64 {
        width
    } else {
        raw as usize
    }
}

/// Render `percent` as a `#`-filled bar of `width` characters.
pub fn render(percent: f64, width: usize) -> GaugeLine {
    render_with(percent, width, FILLED_GLYPH, EMPTY_GLYPH)
}

pub fn render_with(percent: f64, width: usize, filled_glyph: char, empty_glyph: char) -> GaugeLine {
    let filled = filled_cells(percent, width);
    let mut text = String::with_capacity(width * filled_glyph.len_utf8().max(empty_glyph.len_utf8()));
    text.extend(std::iter::repeat(filled_glyph).take(filled));
    text.extend(std::iter::repeat(empty_glyph).take(width - filled));
    GaugeLine { text, filled }
}
