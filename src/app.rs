use tracing::{debug, warn};

use crate::config::Config;
use crate::system::counters::CounterBackend;
use crate::system::sampler::Sampler;
use crate::ui::{self, PlacedLine};

/// Main application state
pub struct App {
    pub should_quit: bool,

    /// Window title (processor name or the default)
    pub title: String,
    pub config: Config,

    /// Last successfully sampled frame. Kept as-is when a tick fails.
    frame: Vec<PlacedLine>,

    // Tick counter, successful and failed samples alike
    pub tick: u64,
}

impl App {
    pub fn new(title: String, config: Config) -> Self {
        Self {
            should_quit: false,
            title,
            config,
            frame: Vec::new(),
            tick: 0,
        }
    }

    pub fn frame(&self) -> &[PlacedLine] {
        &self.frame
    }

    pub fn set_frame(&mut self, frame: Vec<PlacedLine>) {
        self.frame = frame;
    }

    /// Redraw handler for one timer tick: sample every core and lay out a
    /// fresh frame. A failed sample is logged and skipped, so the previous
    /// frame stays on screen (blank if nothing was ever sampled).
    ///
    /// Returns whether the frame changed.
    pub fn on_tick<B: CounterBackend>(&mut self, sampler: &mut Sampler<B>) -> bool {
        self.tick += 1;
        match sampler.on_tick() {
            Ok(sample) => {
                debug!(tick = self.tick, cores = sample.len(), "sampled");
                self.frame = ui::layout_frame(sample, &self.config);
                true
            }
            Err(e) => {
                warn!(tick = self.tick, error = %e, "sample failed, skipping redraw");
                false
            }
        }
    }
}
