//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem for binaries embedding the codecs
//! - Configure log level from config, overridable via environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Library code only emits events; installing a subscriber is the
//!   embedding binary's call
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber at `level` unless `RUST_LOG` is set.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

fn default_filter(level: &str) -> String {
    format!("gateway_wire={level},transcode={level}")
}
