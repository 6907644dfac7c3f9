//! Fixed coregauge settings.
//!
//! There is no config file and no command line: every knob is a constant,
//! collected into a [`Config`] value that the app carries around so the
//! drawing and sampling code never reaches for globals.

use std::time::Duration;

/// Sampling / redraw period in milliseconds
pub const UPDATE_INTERVAL_MS: u64 = 1000;

/// ID of the one recurring timer that drives sampling
pub const TIMER_ID: u32 = 1;

/// Width of every gauge, in characters
pub const BAR_WIDTH: usize = 50;

pub const FILLED_GLYPH: char = '#';
pub const EMPTY_GLYPH: char = ' ';

/// Column of the first gauge character
pub const LEFT_MARGIN: u16 = 1;
/// Row of core 0's gauge
pub const BASELINE_ROW: u16 = 1;
/// Rows between consecutive cores
pub const LINE_HEIGHT: u16 = 1;

/// Title used when the processor name can't be looked up
pub const DEFAULT_TITLE: &str = "CPU Load Monitor";

/// Size of the title buffer in bytes, terminator included
pub const TITLE_CAPACITY: usize = 128;

/// Runtime view of the constants above
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub update_interval: Duration,
    pub timer_id: u32,
    pub bar_width: usize,
    pub filled_glyph: char,
    pub empty_glyph: char,
    pub left_margin: u16,
    pub baseline_row: u16,
    pub line_height: u16,
    pub default_title: &'static str,
    pub title_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(UPDATE_INTERVAL_MS),
            timer_id: TIMER_ID,
            bar_width: BAR_WIDTH,
            filled_glyph: FILLED_GLYPH,
            empty_glyph: EMPTY_GLYPH,
            left_margin: LEFT_MARGIN,
            baseline_row: BASELINE_ROW,
            line_height: LINE_HEIGHT,
            default_title: DEFAULT_TITLE,
            title_capacity: TITLE_CAPACITY,
        }
    }
}

impl Config {
    /// Longest title that fits the title buffer (one byte is kept for the terminator)
    pub fn max_title_bytes(&self) -> usize {
        self.title_capacity.saturating_sub(1)
    }
}
