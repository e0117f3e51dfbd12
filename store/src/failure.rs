//! Consecutive re-validation failure counters.

use std::sync::Arc;

use badge_types::{Handle, ModuleKey};

use crate::kv::{KvStore, FAILURE_PREFIX};
use crate::StoreError;

pub fn failure_key(module: &ModuleKey, handle: &Handle) -> String {
    format!("{FAILURE_PREFIX}{module}-{handle}")
}

/// `(module, handle) -> count` over the `failures` namespace. An absent key
/// means zero failures.
#[derive(Clone)]
pub struct FailureStore {
    kv: Arc<dyn KvStore>,
}

impl FailureStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn get_count(&self, module: &ModuleKey, handle: &Handle) -> Result<u32, StoreError> {
        let key = failure_key(module, handle);
        let Some(raw) = self.kv.get(&key)? else {
            return Ok(0);
        };
        std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .ok_or_else(|| StoreError::Corruption(format!("{key}: not a decimal count")))
    }

    /// Persist `count`. Zero clears the record instead of storing it.
    pub fn set_count(
        &self,
        module: &ModuleKey,
        handle: &Handle,
        count: u32,
    ) -> Result<(), StoreError> {
        if count == 0 {
            return self.clear(module, handle);
        }
        self.kv
            .put(&failure_key(module, handle), count.to_string().as_bytes())
    }

    pub fn clear(&self, module: &ModuleKey, handle: &Handle) -> Result<(), StoreError> {
        self.kv.delete(&failure_key(module, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout() {
        let module = ModuleKey::parse("mvp").unwrap();
        let handle = Handle::parse("alice.bsky.social").unwrap();
        assert_eq!(failure_key(&module, &handle), "failure-mvp-alice.bsky.social");
    }
}
