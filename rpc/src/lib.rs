//! HTTP surface of the badge service.
//!
//! Provides endpoints for:
//! - Credential validation and enrollment (and verify-only previews)
//! - Unverify
//! - Read-only module naming, explanation text and group lookup
//! - Failure-count reports and status queries from the weekly reconciliation
//! - Prometheus metrics

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use error::RpcError;
pub use handlers::AppState;
pub use metrics::RpcMetrics;
pub use server::{router, RpcServer};
