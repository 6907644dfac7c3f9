//! Per-core "% Processor Time" counter session.
//!
//! The session is written once against [`CounterBackend`], a trait shaped
//! after the PDH call set (open query, add counter, collect, format, remove,
//! close). On Windows the backend is PDH itself; elsewhere `sysinfo` stands
//! in with the same handle/status contract.
//!
//! Lifecycle:
//!   open  -> one query, one counter per logical core, one throwaway collection
//!   sample -> one collection, then every counter formatted in core order
//!   close -> counters removed, then the query; repeated calls are no-ops

use tracing::{debug, info, warn};

use crate::system::error::{CounterInitError, CounterReadError};

// ─── PDH vocabulary ──────────────────────────────────────────────────────────

pub type QueryHandle = isize;
pub type CounterHandle = isize;
/// Raw PDH status code (`ERROR_SUCCESS` or a `PDH_*` value)
pub type PdhStatus = u32;

pub const ERROR_SUCCESS: PdhStatus = 0;
pub const PDH_CSTATUS_VALID_DATA: PdhStatus = 0x0000_0000;
pub const PDH_CSTATUS_NEW_DATA: PdhStatus = 0x0000_0001;
pub const PDH_CSTATUS_NO_INSTANCE: PdhStatus = 0x8000_07D1;
pub const PDH_NO_DATA: PdhStatus = 0x8000_07D5;
pub const PDH_CSTATUS_NO_OBJECT: PdhStatus = 0xC000_0BB8;
pub const PDH_INVALID_HANDLE: PdhStatus = 0xC000_0BBC;
pub const PDH_INVALID_DATA: PdhStatus = 0xC000_0BC6;

const PROCESSOR_PATH_PREFIX: &str = "\\Processor(";
const PROCESSOR_PATH_SUFFIX: &str = ")\\% Processor Time";

/// Locale-invariant counter path for one logical core:
/// `\Processor(<index>)\% Processor Time`
pub fn processor_counter_path(core: usize) -> String {
    format!("{PROCESSOR_PATH_PREFIX}{core}{PROCESSOR_PATH_SUFFIX}")
}

/// Inverse of [`processor_counter_path`]. `None` for anything else,
/// including the `_Total` instance.
pub fn parse_processor_counter_path(path: &str) -> Option<usize> {
    let index = path
        .strip_prefix(PROCESSOR_PATH_PREFIX)?
        .strip_suffix(PROCESSOR_PATH_SUFFIX)?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok()
}

// ─── Backend seam ────────────────────────────────────────────────────────────

/// The slice of the performance-counter API the session needs.
///
/// Every call reports failure as the raw status code so the session can
/// attach it to a typed error.
pub trait CounterBackend {
    /// Number of logical processors on this machine
    fn logical_cores(&self) -> usize;

    fn open_query(&mut self) -> Result<QueryHandle, PdhStatus>;

    /// Register a counter by its English (locale-invariant) path
    fn add_counter(&mut self, query: QueryHandle, path: &str) -> Result<CounterHandle, PdhStatus>;

    /// One collection pass over every counter in the query
    fn collect(&mut self, query: QueryHandle) -> Result<(), PdhStatus>;

    /// Latest computed value of a counter, as a double
    fn formatted_value(&mut self, counter: CounterHandle) -> Result<f64, PdhStatus>;

    fn remove_counter(&mut self, counter: CounterHandle) -> Result<(), PdhStatus>;

    fn close_query(&mut self, query: QueryHandle) -> Result<(), PdhStatus>;
}

// ─── Data model ──────────────────────────────────────────────────────────────

/// Number of logical processors seen when the session was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreCount(usize);

impl CoreCount {
    pub fn get(self) -> usize {
        self.0
    }
}

/// One percentage per core, in core-index order.
/// Values are passed through unclamped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadSample {
    loads: Vec<f64>,
}

impl LoadSample {
    fn zeroed(cores: usize) -> Self {
        Self { loads: vec![0.0; cores] }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.loads
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.loads.iter().copied()
    }
}

impl From<Vec<f64>> for LoadSample {
    fn from(loads: Vec<f64>) -> Self {
        Self { loads }
    }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Open counter query plus one counter per logical core.
///
/// The counter count is fixed at open time. Dropping an open session
/// closes it.
pub struct CounterSession<B: CounterBackend> {
    backend: B,
    query: Option<QueryHandle>,
    counters: Vec<CounterHandle>,
    core_count: CoreCount,
    /// Reused by every sample
    sample: LoadSample,
}

impl<B: CounterBackend> CounterSession<B> {
    /// Open a query, register every core's counter and run the warm-up pass.
    ///
    /// Rate counters need two collections before they report anything
    /// meaningful, so the first one happens here and is thrown away. On any
    /// failure everything registered so far is released before returning.
    pub fn open(mut backend: B) -> Result<Self, CounterInitError> {
        let cores = backend.logical_cores();
        if cores == 0 {
            return Err(CounterInitError::NoCores);
        }

        let query = backend
            .open_query()
            .map_err(|status| CounterInitError::OpenQuery { status })?;

        let mut counters = Vec::with_capacity(cores);
        for core in 0..cores {
            let path = processor_counter_path(core);
            match backend.add_counter(query, &path) {
                Ok(counter) => counters.push(counter),
                Err(status) => {
                    warn!(%path, status = format_args!("{status:#010x}"), "counter registration failed, rolling back");
                    release(&mut backend, query, &mut counters);
                    return Err(CounterInitError::AddCounter { path, status });
                }
            }
        }

        if let Err(status) = backend.collect(query) {
            release(&mut backend, query, &mut counters);
            return Err(CounterInitError::WarmUp { status });
        }

        info!(cores, "counter session opened");
        Ok(Self {
            backend,
            query: Some(query),
            counters,
            core_count: CoreCount(cores),
            sample: LoadSample::zeroed(cores),
        })
    }

    pub fn core_count(&self) -> CoreCount {
        self.core_count
    }

    pub fn is_open(&self) -> bool {
        self.query.is_some()
    }

    /// Collect once and read every core's value in index order.
    ///
    /// A failed format call on any core fails the whole sample; the buffer
    /// may then hold a mix of old and new values and is not handed out.
    pub fn sample(&mut self) -> Result<&LoadSample, CounterReadError> {
        let query = self.query.ok_or(CounterReadError::Closed)?;

        self.backend
            .collect(query)
            .map_err(|status| CounterReadError::Collect { status })?;

        for (core, (&counter, slot)) in self
            .counters
            .iter()
            .zip(self.sample.loads.iter_mut())
            .enumerate()
        {
            *slot = self
                .backend
                .formatted_value(counter)
                .map_err(|status| CounterReadError::Format { core, status })?;
        }

        Ok(&self.sample)
    }

    /// Remove every counter, then close the query. Calling it again does nothing.
    pub fn close(&mut self) {
        let Some(query) = self.query.take() else {
            return;
        };
        release(&mut self.backend, query, &mut self.counters);
        info!("counter session closed");
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: CounterBackend> Drop for CounterSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Release counters (in registration order) and then the query.
/// Failures are logged and the remaining handles are still released.
fn release<B: CounterBackend>(backend: &mut B, query: QueryHandle, counters: &mut Vec<CounterHandle>) {
    for counter in counters.drain(..) {
        if let Err(status) = backend.remove_counter(counter) {
            warn!(counter, status = format_args!("{status:#010x}"), "failed to remove counter");
        }
    }
    if let Err(status) = backend.close_query(query) {
        warn!(status = format_args!("{status:#010x}"), "failed to close counter query");
    } else {
        debug!("counter query closed");
    }
}
