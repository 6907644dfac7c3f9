//! Tick-driven sampling.

use crate::system::counters::{CoreCount, CounterBackend, CounterSession, LoadSample};
use crate::system::error::{CounterInitError, CounterReadError};

/// Owns the counter session and turns each timer tick into one sample.
///
/// Every tick is an independent point sample: nothing is cached, averaged
/// or carried over between calls.
pub struct Sampler<B: CounterBackend> {
    session: CounterSession<B>,
}

impl<B: CounterBackend> Sampler<B> {
    pub fn open(backend: B) -> Result<Self, CounterInitError> {
        Ok(Self {
            session: CounterSession::open(backend)?,
        })
    }

    pub fn core_count(&self) -> CoreCount {
        self.session.core_count()
    }

    pub fn on_tick(&mut self) -> Result<&LoadSample, CounterReadError> {
        self.session.sample()
    }

    /// Release the session. Safe to call more than once.
    pub fn close(&mut self) {
        self.session.close();
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }
}
