use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No membership record under the requested key.
    #[error("no record for key: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored value that does not decode as the expected record.
    #[error("stored value is corrupted: {0}")]
    Corruption(String),
}
