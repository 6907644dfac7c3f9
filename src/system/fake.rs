//! Scripted counter backend for tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::system::counters::{
    parse_processor_counter_path, CounterBackend, CounterHandle, PdhStatus, QueryHandle,
    PDH_CSTATUS_NO_INSTANCE, PDH_INVALID_HANDLE,
};

const QUERY_HANDLE: QueryHandle = 0x100;
const COUNTER_BASE: CounterHandle = 0x1000;

/// What the backend has been asked to release. Shared so tests can still
/// read it after the session (and the backend inside it) is gone.
#[derive(Debug, Default)]
pub struct ReleaseLog {
    pub removed_counters: usize,
    pub closed_queries: usize,
    pub double_releases: usize,
}

/// Fake PDH: values come from a script, failures are injected per call.
pub struct FakeBackend {
    cores: usize,
    /// One row per post-warm-up collection; the last row repeats
    samples: Vec<Vec<f64>>,
    open_query_failure: Option<PdhStatus>,
    add_counter_failure: Option<(usize, PdhStatus)>,
    collect_failure: Option<(usize, PdhStatus)>,
    format_failure: Option<(usize, PdhStatus)>,

    query_open: bool,
    live_counters: HashSet<CounterHandle>,
    added_paths: Vec<String>,
    collections: usize,
    log: Rc<RefCell<ReleaseLog>>,
}

impl FakeBackend {
    pub fn new(cores: usize) -> Self {
        Self {
            cores,
            samples: Vec::new(),
            open_query_failure: None,
            add_counter_failure: None,
            collect_failure: None,
            format_failure: None,
            query_open: false,
            live_counters: HashSet::new(),
            added_paths: Vec::new(),
            collections: 0,
            log: Rc::new(RefCell::new(ReleaseLog::default())),
        }
    }

    pub fn with_samples(mut self, samples: Vec<Vec<f64>>) -> Self {
        self.samples = samples;
        self
    }

    pub fn fail_open_query(mut self, status: PdhStatus) -> Self {
        self.open_query_failure = Some(status);
        self
    }

    /// Fail registration of the counter at position `index`
    pub fn fail_add_counter_at(mut self, index: usize, status: PdhStatus) -> Self {
        self.add_counter_failure = Some((index, status));
        self
    }

    /// Fail the `nth` collection pass (0 is the warm-up pass)
    pub fn fail_collect_at(mut self, nth: usize, status: PdhStatus) -> Self {
        self.collect_failure = Some((nth, status));
        self
    }

    pub fn fail_format_for_core(mut self, core: usize, status: PdhStatus) -> Self {
        self.format_failure = Some((core, status));
        self
    }

    pub fn release_log(&self) -> Rc<RefCell<ReleaseLog>> {
        Rc::clone(&self.log)
    }

    pub fn added_paths(&self) -> &[String] {
        &self.added_paths
    }

    pub fn collections(&self) -> usize {
        self.collections
    }

    fn current_value(&self, core: usize) -> f64 {
        // Collection 1 is the warm-up; scripted rows start at collection 2.
        let row = self.collections.saturating_sub(2);
        self.samples
            .get(row)
            .or_else(|| self.samples.last())
            .and_then(|values| values.get(core).copied())
            .unwrap_or(0.0)
    }
}

impl CounterBackend for FakeBackend {
    fn logical_cores(&self) -> usize {
        self.cores
    }

    fn open_query(&mut self) -> Result<QueryHandle, PdhStatus> {
        if let Some(status) = self.open_query_failure {
            return Err(status);
        }
        self.query_open = true;
        Ok(QUERY_HANDLE)
    }

    fn add_counter(&mut self, query: QueryHandle, path: &str) -> Result<CounterHandle, PdhStatus> {
        if query != QUERY_HANDLE || !self.query_open {
            return Err(PDH_INVALID_HANDLE);
        }
        if let Some((index, status)) = self.add_counter_failure {
            if index == self.added_paths.len() {
                return Err(status);
            }
        }
        let core = parse_processor_counter_path(path).ok_or(PDH_CSTATUS_NO_INSTANCE)?;
        let handle = COUNTER_BASE + core as CounterHandle;
        self.live_counters.insert(handle);
        self.added_paths.push(path.to_string());
        Ok(handle)
    }

    fn collect(&mut self, query: QueryHandle) -> Result<(), PdhStatus> {
        if query != QUERY_HANDLE || !self.query_open {
            return Err(PDH_INVALID_HANDLE);
        }
        let nth = self.collections;
        self.collections += 1;
        match self.collect_failure {
            Some((fail_at, status)) if fail_at == nth => Err(status),
            _ => Ok(()),
        }
    }

    fn formatted_value(&mut self, counter: CounterHandle) -> Result<f64, PdhStatus> {
        if !self.live_counters.contains(&counter) {
            return Err(PDH_INVALID_HANDLE);
        }
        let core = (counter - COUNTER_BASE) as usize;
        match self.format_failure {
            Some((fail_core, status)) if fail_core == core => Err(status),
            _ => Ok(self.current_value(core)),
        }
    }

    fn remove_counter(&mut self, counter: CounterHandle) -> Result<(), PdhStatus> {
        let mut log = self.log.borrow_mut();
        if self.live_counters.remove(&counter) {
            log.removed_counters += 1;
            Ok(())
        } else {
            log.double_releases += 1;
            Err(PDH_INVALID_HANDLE)
        }
    }

    fn close_query(&mut self, query: QueryHandle) -> Result<(), PdhStatus> {
        let mut log = self.log.borrow_mut();
        if query == QUERY_HANDLE && self.query_open {
            self.query_open = false;
            log.closed_queries += 1;
            Ok(())
        } else {
            log.double_releases += 1;
            Err(PDH_INVALID_HANDLE)
        }
    }
}
