//! Error taxonomy for the sampling core and the name lookup.

use thiserror::Error;

use crate::system::counters::PdhStatus;

/// Opening the counter session failed; no usable session exists.
#[derive(Debug, Error)]
pub enum CounterInitError {
    #[error("no logical processors detected")]
    NoCores,

    #[error("failed to open counter query (status {status:#010x})")]
    OpenQuery { status: PdhStatus },

    #[error("failed to register counter `{path}` (status {status:#010x})")]
    AddCounter { path: String, status: PdhStatus },

    #[error("warm-up collection pass failed (status {status:#010x})")]
    WarmUp { status: PdhStatus },
}

/// A single sampling pass failed.
#[derive(Debug, Error)]
pub enum CounterReadError {
    #[error("counter session is closed")]
    Closed,

    #[error("collection pass failed (status {status:#010x})")]
    Collect { status: PdhStatus },

    #[error("failed to format counter for core {core} (status {status:#010x})")]
    Format { core: usize, status: PdhStatus },
}

/// Processor name lookup failed at some stage. Never fatal.
#[derive(Debug, Error)]
pub enum NameLookupError {
    #[error("failed to initialize COM: {0}")]
    Com(String),

    #[error("could not connect to the inventory service: {0}")]
    Connect(String),

    #[error("processor name query failed: {0}")]
    Query(String),

    #[error("inventory returned no processor name")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_render_as_hex() {
        let err = CounterInitError::AddCounter {
            path: "\\Processor(3)\\% Processor Time".to_string(),
            status: 0xC0000BB8,
        };
        assert_eq!(
            err.to_string(),
            "failed to register counter `\\Processor(3)\\% Processor Time` (status 0xc0000bb8)"
        );

        let err = CounterReadError::Format { core: 2, status: 0x800007D5 };
        assert_eq!(
            err.to_string(),
            "failed to format counter for core 2 (status 0x800007d5)"
        );
    }
}
