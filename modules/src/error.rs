use badge_naming::NamingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("unknown module: {0}")]
    UnknownModule(String),

    #[error("credential check failed: {0}")]
    RequestFailed(String),

    #[error("credential source unreachable: {0}")]
    Unreachable(String),

    #[error("invalid response from credential source: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Naming(#[from] NamingError),
}

impl From<reqwest::Error> for ModuleError {
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
