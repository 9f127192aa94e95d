use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber: flattened JSON events on stderr, filtered
/// by `RUST_LOG` with `info` as the default level.
///
/// Stdout carries command output only.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .json()
        .flatten_event(true)
        .init();
}

/// Colored diagnostics only when a person is reading stderr.
pub fn default_log_mode() -> LogMode {
    if io::stderr().is_terminal() {
        LogMode::Pretty
    } else {
        LogMode::Raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Raw,
    Pretty,
}
