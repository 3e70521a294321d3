//! Tracing subscriber setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is
//! left to the process entry point.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `credkeep=debug`.
pub const LOG_ENV: &str = "CREDKEEP_LOG";

/// Install a stderr fmt subscriber.
///
/// The default level is `warn`, or `debug` with `verbose`; `CREDKEEP_LOG`
/// overrides both.  Calling this twice is harmless.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
