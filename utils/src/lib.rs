//! Shared utilities for the badge service.

pub mod logging;

pub use logging::{init_tracing, LogFormat, LoggingError};
