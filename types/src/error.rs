//! Errors raised while constructing the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid handle: {0:?}")]
    InvalidHandle(String),

    #[error("invalid module key: {0:?}")]
    InvalidModuleKey(String),
}
