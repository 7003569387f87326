//! Global logger setup shared by the binary and tests.
//!
//! Only this crate logs at the requested level. Engine crates stay at
//! `warn` so a verbose run shows crosser flips without Bevy's own chatter.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Filter directive used when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    format!("{},{}={level}", LevelFilter::Warn, env!("CARGO_CRATE_NAME"))
}

/// Initializes the global logger.
///
/// `verbose` raises this crate to debug level, where direction flips and
/// deferred initializations are reported. `RUST_LOG` replaces the whole
/// filter.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_target(verbose);

    // Repeated calls from tests find a logger already installed.
    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}
