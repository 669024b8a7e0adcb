//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "story_playground=info";

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for command output. `verbose` raises this crate to `debug`.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("story_playground=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
