use badge_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    /// Lists are provisioned ahead of time; assignment never creates them.
    #[error("no list found with title: {0}")]
    ListNotFound(String),

    #[error("social graph rejected credentials: {0}")]
    Unauthorized(String),

    #[error("social graph request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from social graph: {0}")]
    InvalidResponse(String),

    #[error("social graph unreachable: {0}")]
    Unreachable(String),

    #[error("session cache: {0}")]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for GroupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}
