//! Windows Performance Data Helper (PDH) backend.
//!
//! Same raw bindings approach as the other PDH users: plain `extern "system"`
//! declarations linked against pdh.dll, handles kept as `isize`.
//! Counters are added with `PdhAddEnglishCounterW` so the
//! `\Processor(N)\% Processor Time` paths work on every display language.

use windows::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};

use crate::system::counters::{
    CounterBackend, CounterHandle, PdhStatus, QueryHandle, ERROR_SUCCESS, PDH_CSTATUS_NEW_DATA,
    PDH_CSTATUS_VALID_DATA,
};

// ─── PDH FFI ─────────────────────────────────────────────────────────────────

const PDH_FMT_DOUBLE: u32 = 0x0000_0200;

#[repr(C)]
#[derive(Copy, Clone, Default)]
#[allow(non_snake_case)]
struct PDH_FMT_COUNTERVALUE_DOUBLE {
    CStatus: u32,
    doubleValue: f64,
}

#[link(name = "pdh")]
extern "system" {
    fn PdhOpenQueryW(
        szDataSource: *const u16,
        dwUserData: usize,
        phQuery: *mut QueryHandle,
    ) -> u32;

    fn PdhAddEnglishCounterW(
        hQuery: QueryHandle,
        szFullCounterPath: *const u16,
        dwUserData: usize,
        phCounter: *mut CounterHandle,
    ) -> u32;

    fn PdhCollectQueryData(hQuery: QueryHandle) -> u32;

    fn PdhGetFormattedCounterValue(
        hCounter: CounterHandle,
        dwFormat: u32,
        lpdwType: *mut u32,
        pValue: *mut PDH_FMT_COUNTERVALUE_DOUBLE,
    ) -> u32;

    fn PdhRemoveCounter(hCounter: CounterHandle) -> u32;

    fn PdhCloseQuery(hQuery: QueryHandle) -> u32;
}

// ─── Backend ─────────────────────────────────────────────────────────────────

/// Live PDH. Holds no state of its own; the session owns every handle.
#[derive(Debug, Default)]
pub struct PdhBackend;

impl PdhBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CounterBackend for PdhBackend {
    fn logical_cores(&self) -> usize {
        let mut info = SYSTEM_INFO::default();
        unsafe { GetSystemInfo(&mut info) };
        info.dwNumberOfProcessors as usize
    }

    fn open_query(&mut self) -> Result<QueryHandle, PdhStatus> {
        let mut query: QueryHandle = 0;
        let status = unsafe { PdhOpenQueryW(std::ptr::null(), 0, &mut query) };
        check(status).map(|()| query)
    }

    fn add_counter(&mut self, query: QueryHandle, path: &str) -> Result<CounterHandle, PdhStatus> {
        let wide = to_wide(path);
        let mut counter: CounterHandle = 0;
        let status = unsafe { PdhAddEnglishCounterW(query, wide.as_ptr(), 0, &mut counter) };
        check(status).map(|()| counter)
    }

    fn collect(&mut self, query: QueryHandle) -> Result<(), PdhStatus> {
        check(unsafe { PdhCollectQueryData(query) })
    }

    fn formatted_value(&mut self, counter: CounterHandle) -> Result<f64, PdhStatus> {
        let mut value = PDH_FMT_COUNTERVALUE_DOUBLE::default();
        let status = unsafe {
            PdhGetFormattedCounterValue(counter, PDH_FMT_DOUBLE, std::ptr::null_mut(), &mut value)
        };
        check(status)?;
        match value.CStatus {
            PDH_CSTATUS_VALID_DATA | PDH_CSTATUS_NEW_DATA => Ok(value.doubleValue),
            other => Err(other),
        }
    }

    fn remove_counter(&mut self, counter: CounterHandle) -> Result<(), PdhStatus> {
        check(unsafe { PdhRemoveCounter(counter) })
    }

    fn close_query(&mut self, query: QueryHandle) -> Result<(), PdhStatus> {
        check(unsafe { PdhCloseQuery(query) })
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn check(status: u32) -> Result<(), PdhStatus> {
    if status == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(status)
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
