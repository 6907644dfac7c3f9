//! Processor display name, used only for the window title.
//!
//! Windows asks WMI (`SELECT Name FROM Win32_Processor`); everything else
//! takes the brand string `sysinfo` reports. Either way the lookup runs once
//! at startup and a failure just means the default title.

use tracing::info;

use crate::config::Config;
use crate::system::error::NameLookupError;

/// Query the inventory service for the processor's display name.
#[cfg(windows)]
pub fn lookup_processor_name() -> Result<String, NameLookupError> {
    use std::collections::HashMap;
    use wmi::{COMLibrary, Variant, WMIConnection};

    // COM, the connection and the result enumerator are all released on drop,
    // including on every early return below.
    let com_lib = COMLibrary::new().map_err(|e| NameLookupError::Com(e.to_string()))?;
    let wmi_con =
        WMIConnection::new(com_lib).map_err(|e| NameLookupError::Connect(e.to_string()))?;

    let rows: Vec<HashMap<String, Variant>> = wmi_con
        .raw_query("SELECT Name FROM Win32_Processor")
        .map_err(|e| NameLookupError::Query(e.to_string()))?;
    tracing::debug!(rows = rows.len(), "Win32_Processor rows");

    let names = rows.into_iter().filter_map(|mut row| match row.remove("Name") {
        Some(Variant::String(name)) => Some(name),
        _ => None,
    });
    first_non_empty(names)
}

/// Ask `sysinfo` for the brand string of the first CPU.
#[cfg(not(windows))]
pub fn lookup_processor_name() -> Result<String, NameLookupError> {
    let mut sys = sysinfo::System::new();
    sys.refresh_cpu_all();
    let names = sys.cpus().iter().map(|cpu| cpu.brand().to_string());
    first_non_empty(names)
}

fn first_non_empty(names: impl Iterator<Item = String>) -> Result<String, NameLookupError> {
    names
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .ok_or(NameLookupError::Empty)
}

/// Cut `name` down to at most `max_bytes` without splitting a character.
pub fn truncate_title(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Window title for this machine: the processor name if the lookup works,
/// otherwise the configured default.
pub fn window_title(
    lookup: impl FnOnce() -> Result<String, NameLookupError>,
    cfg: &Config,
) -> String {
    match lookup() {
        Ok(name) => truncate_title(&name, cfg.max_title_bytes()).to_string(),
        Err(e) => {
            info!(error = %e, "processor name unavailable, using default title");
            cfg.default_title.to_string()
        }
    }
}
