use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::error::{Error, Result};

/// Map `-v` occurrences to a level; without flags only `RUST_LOG` applies
pub fn verbosity_level(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

/// Initializes `tracing` as the logger.
///
/// `level` is the default directive and can be overridden with `RUST_LOG`.
/// With `JSON_LOGS` set, logs are written as JSON. Initializing twice is not
/// an error.
pub fn initialize_logger(level: Option<LevelFilter>) -> Result<()> {
    let layer = fmt::layer().with_writer(std::io::stderr);
    let json_layer = fmt::layer::<Registry>().with_writer(std::io::stderr).json();

    let filter = match level {
        Some(level) => EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy(),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    };

    let res = if std::env::var("JSON_LOGS").is_ok() {
        tracing_subscriber::util::SubscriberInitExt::try_init(
            tracing_subscriber::registry().with(json_layer).with(filter),
        )
    } else {
        tracing_subscriber::util::SubscriberInitExt::try_init(
            tracing_subscriber::registry().with(layer).with(filter),
        )
    };

    if let Err(e) = res {
        if e.to_string() != "a global default trace dispatcher has already been set" {
            return Err(Error::Config(e.to_string()));
        }

        tracing::trace!("Tracing is already initialized, skipping without errors...");
    };

    Ok(())
}
