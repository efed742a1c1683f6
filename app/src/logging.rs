use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LOG_ENV;

const DEFAULT_FILTER: &str = "warn,corpsim=info,domain=info,csv_adapter=info";

/// Logs to stderr so snapshots on stdout stay machine-readable.
/// The filter comes from `CORPSIM_LOG_LEVEL`, then `RUST_LOG`.
pub fn init() -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV.as_str())
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
