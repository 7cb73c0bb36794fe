//! Log output for the app and its tools.

use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Install a global subscriber that writes human readable logs to stdout.
///
/// The level defaults to `info` and can be overridden with the `RUST_LOG` environment
/// variable, e.g. `RUST_LOG=catsverse=debug`.
///
/// # Errors
/// Returns an error if a global subscriber has already been installed.
pub fn setup_logging() -> Result<(), TryInitError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(filter)
        .try_init()
}
