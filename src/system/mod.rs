pub mod counters;
pub mod error;
#[cfg(test)]
pub mod fake;
#[cfg(windows)]
pub mod pdh;
pub mod processor;
pub mod sampler;
pub mod sysinfo_backend;

/// Counter backend for the platform we're built for
#[cfg(windows)]
pub type PlatformBackend = pdh::PdhBackend;
#[cfg(not(windows))]
pub type PlatformBackend = sysinfo_backend::SysinfoBackend;
