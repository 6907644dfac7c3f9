//! Portable counter backend built on `sysinfo`.
//!
//! `sysinfo` has no query/counter objects, so this backend hands out its own
//! handles and enforces the same rules PDH does: counters only exist inside
//! an open query, paths must name a real core, and released handles are dead.

use sysinfo::System;

use crate::system::counters::{
    parse_processor_counter_path, CounterBackend, CounterHandle, PdhStatus, QueryHandle,
    PDH_CSTATUS_NO_INSTANCE, PDH_INVALID_HANDLE,
};

const QUERY_HANDLE: QueryHandle = 1;

pub struct SysinfoBackend {
    sys: System,
    query_open: bool,
    /// Registration state per core index
    registered: Vec<bool>,
}

impl SysinfoBackend {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        let cores = sys.cpus().len();
        Self {
            sys,
            query_open: false,
            registered: vec![false; cores],
        }
    }

    fn check_query(&self, query: QueryHandle) -> Result<(), PdhStatus> {
        if self.query_open && query == QUERY_HANDLE {
            Ok(())
        } else {
            Err(PDH_INVALID_HANDLE)
        }
    }

    /// Core index behind a live counter handle
    fn core_of(&self, counter: CounterHandle) -> Result<usize, PdhStatus> {
        let core = counter
            .checked_sub(1)
            .and_then(|c| usize::try_from(c).ok())
            .ok_or(PDH_INVALID_HANDLE)?;
        match self.registered.get(core) {
            Some(true) => Ok(core),
            _ => Err(PDH_INVALID_HANDLE),
        }
    }
}

impl Default for SysinfoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterBackend for SysinfoBackend {
    fn logical_cores(&self) -> usize {
        self.registered.len()
    }

    fn open_query(&mut self) -> Result<QueryHandle, PdhStatus> {
        if self.query_open {
            return Err(PDH_INVALID_HANDLE);
        }
        self.query_open = true;
        Ok(QUERY_HANDLE)
    }

    fn add_counter(&mut self, query: QueryHandle, path: &str) -> Result<CounterHandle, PdhStatus> {
        self.check_query(query)?;
        let core = parse_processor_counter_path(path)
            .filter(|&core| core < self.registered.len())
            .ok_or(PDH_CSTATUS_NO_INSTANCE)?;
        self.registered[core] = true;
        Ok(core as CounterHandle + 1)
    }

    fn collect(&mut self, query: QueryHandle) -> Result<(), PdhStatus> {
        self.check_query(query)?;
        self.sys.refresh_cpu_usage();
        Ok(())
    }

    fn formatted_value(&mut self, counter: CounterHandle) -> Result<f64, PdhStatus> {
        let core = self.core_of(counter)?;
        self.sys
            .cpus()
            .get(core)
            .map(|cpu| f64::from(cpu.cpu_usage()))
            .ok_or(PDH_CSTATUS_NO_INSTANCE)
    }

    fn remove_counter(&mut self, counter: CounterHandle) -> Result<(), PdhStatus> {
        let core = self.core_of(counter)?;
        self.registered[core] = false;
        Ok(())
    }

    fn close_query(&mut self, query: QueryHandle) -> Result<(), PdhStatus> {
        self.check_query(query)?;
        self.query_open = false;
        self.registered.iter_mut().for_each(|r| *r = false);
        Ok(())
    }
}
