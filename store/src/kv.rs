//! Key-value backend trait.

use crate::StoreError;

/// Cached operator access token. Shares the `default` namespace with
/// membership records.
pub const ACCESS_JWT_KEY: &str = "accessJwt";

/// Cached operator service endpoint.
pub const ENDPOINT_KEY: &str = "endpoint";

/// Prefix of failure-counter keys.
pub const FAILURE_PREFIX: &str = "failure-";

/// Keys that never denote a membership record.
pub fn is_reserved(key: &str) -> bool {
    key.is_empty() || key == ACCESS_JWT_KEY || key == ENDPOINT_KEY || key.starts_with(FAILURE_PREFIX)
}

/// One namespace of string keys and byte values.
///
/// Single-key operations only; there are no multi-key transactions and
/// writes are last-writer-wins.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// All keys starting with `prefix`, in byte order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.keys_with_prefix("")
    }
}
