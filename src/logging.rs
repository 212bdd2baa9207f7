//! Opt-in log output.
//!
//! pqdsn emits `tracing` events but never installs a subscriber itself.
//! [`init`] sets up a `fmt` subscriber for applications that have none.
//! Events carry field counts and environment names, never parameter values.

use tracing_subscriber::EnvFilter;

/// Variable holding the filter directives, such as `pqdsn=debug`.
pub const LOG_ENV: &str = "PQDSN_LOG";

/// Install a global subscriber filtered by `PQDSN_LOG`.
///
/// Returns `false` if the variable is unset or a global subscriber is
/// already installed.
pub fn init() -> bool {
    match std::env::var(LOG_ENV) {
        Ok(directives) => init_with(&directives),
        Err(_) => false,
    }
}

/// Install a global subscriber filtered by `directives`.
///
/// Directives that fail to parse fall back to `warn`. Returns `false` if a
/// global subscriber is already installed.
pub fn init_with(directives: &str) -> bool {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
