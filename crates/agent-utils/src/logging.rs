//! Logging and tracing utilities

use std::str::FromStr;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Initialize tracing subscriber with default configuration
///
/// Text output on stderr, `info` unless `RUST_LOG` says otherwise. Does
/// nothing if a subscriber is already installed.
pub fn init_tracing() {
    if init_tracing_with(DEFAULT_FILTER, LogFormat::Text).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Initialize tracing with an explicit default filter and format
///
/// `RUST_LOG` still takes precedence over `default_filter`. Events go to
/// stderr so stdout stays free for program output.
pub fn init_tracing_with(default_filter: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter = env_filter(default_filter);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
