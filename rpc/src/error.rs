//! RPC error types and their HTTP mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use badge_lifecycle::LifecycleError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("metrics error: {0}")]
    Metrics(String),
}

impl From<badge_types::TypesError> for RpcError {
    fn from(e: badge_types::TypesError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        RpcError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for RpcError {
    fn from(rejection: QueryRejection) -> Self {
        RpcError::InvalidRequest(rejection.body_text())
    }
}

impl From<prometheus::Error> for RpcError {
    fn from(e: prometheus::Error) -> Self {
        RpcError::Metrics(e.to_string())
    }
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Lifecycle(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Lifecycle(_) | Self::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(RpcError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            RpcError::Lifecycle(LifecycleError::Rejected("no".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::Lifecycle(LifecycleError::Timeout(10)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
