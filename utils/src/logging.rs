//! Tracing subscriber set-up for the badge service.
//!
//! `RUST_LOG` takes precedence over the configured level, so a single run can
//! be made verbose without touching the configuration file.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain lines for a terminal.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoggingError {
    #[error("unknown log format: {0} (expected \"human\" or \"json\")")]
    UnknownFormat(String),

    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnknownFormat(other.to_string())),
        }
    }
}

/// Build the filter: `RUST_LOG` when set, `level` otherwise.
pub fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter(e.to_string()))
        }
    }
}

/// Install the global subscriber. Fails when called twice in one process.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let filter = env_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Human => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(false))
            .try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInitialized)
}
