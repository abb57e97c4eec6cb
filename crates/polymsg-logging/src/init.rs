//! Subscriber installation

use crate::reload::{LoggingError, LoggingResult, ReloadHandle};
use crate::LogLevel;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, reload};

/// Environment variable consulted for per-target filtering
pub const LOG_ENV: &str = "RUST_LOG";

/// Install the global subscriber: a reloadable level filter, an optional
/// `RUST_LOG` filter and a compact fmt layer on stderr.
///
/// The level can be changed afterwards through [`ReloadHandle::global`].
/// Fails if a global subscriber is already installed.
pub fn init_logging(level: LogLevel) -> LoggingResult<()> {
    use tracing_subscriber::prelude::*;

    let (filter, handle) = reload::Layer::new(LevelFilter::from(level));
    let env_filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok());

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))?;
    ReloadHandle::global().set_handle(handle);
    Ok(())
}
