//! Logging Infrastructure
//!
//! Logs go to stderr so they never mix with what the command prints for the user.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "mcprint=info,mcprinter=info";

/// Initialize the logger
///
/// `level` wins over `RUST_LOG`; with neither set, both crates log at info.
pub fn init_logger(level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}

/// Filter from `level`, else `RUST_LOG`; unparsable input gives the default
fn env_filter(level: Option<&str>) -> EnvFilter {
    let default = || EnvFilter::new(DEFAULT_FILTER);
    match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| default()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| default()),
    }
}
