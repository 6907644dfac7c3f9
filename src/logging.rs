//! Log output.
//!
//! The gauges own the terminal, so log lines only go out when stderr has
//! been redirected away from it (`coregauge 2>gauge.log`).

use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;

/// Install the global subscriber. Logging is off while stderr is the terminal
/// being drawn on.
pub fn init() {
    let redirected = !std::io::stderr().is_terminal();
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_max_level(max_level(redirected))
        .try_init();
}

fn max_level(stderr_redirected: bool) -> LevelFilter {
    if stderr_redirected {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}
