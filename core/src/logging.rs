use tracing_subscriber::{fmt, EnvFilter};

use crate::error::PumpLogError;

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `filter` is used, e.g. `"info"` or
/// `"pumplog_core=debug"`. Fails if a global subscriber is already installed.
pub fn init_logging(filter: String) -> Result<(), PumpLogError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter))
        .map_err(|e| PumpLogError::Logging(e.to_string()))?;

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| PumpLogError::Logging(e.to_string()))
}
