//! Log output setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Log, LogFormat};
use crate::{Error, Result};

/// Install the global subscriber. `RUST_LOG` wins over `log.filter`.
pub fn init(log: &Log) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.filter)
            .map_err(|e| Error::Config(format!("Invalid log filter {:?}: {e}", log.filter)))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match log.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(true))
            .try_init(),
    };

    installed.map_err(|e| Error::Config(format!("Logging already initialized: {e}")))
}
