//! Membership records: the authoritative "verified for this module" fact.

use std::sync::Arc;

use badge_types::{Handle, ModuleKey};
use tracing::warn;

use crate::kv::{is_reserved, KvStore};
use crate::StoreError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipRecord {
    pub module: ModuleKey,
    pub verification_id: String,
    pub handle: Handle,
}

impl MembershipRecord {
    pub fn key(&self) -> String {
        record_key(&self.module, &self.verification_id)
    }
}

pub fn record_key(module: &ModuleKey, verification_id: &str) -> String {
    format!("{module}-{verification_id}")
}

/// Split a record key on its first `-`. Reserved keys and keys whose prefix is
/// not a module key yield `None`.
pub fn parse_record_key(key: &str) -> Option<(ModuleKey, String)> {
    if is_reserved(key) {
        return None;
    }
    let (raw_module, verification_id) = key.split_once('-')?;
    let module = ModuleKey::parse(raw_module).ok()?;
    if module.as_str() != raw_module {
        return None;
    }
    Some((module, verification_id.to_string()))
}

/// `(module, verificationId) -> handle` over the `default` namespace.
#[derive(Clone)]
pub struct MembershipStore {
    kv: Arc<dyn KvStore>,
}

impl MembershipStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn put(
        &self,
        module: &ModuleKey,
        verification_id: &str,
        handle: &Handle,
    ) -> Result<(), StoreError> {
        self.kv
            .put(&record_key(module, verification_id), handle.as_str().as_bytes())
    }

    pub fn get(&self, module: &ModuleKey, verification_id: &str) -> Result<Handle, StoreError> {
        let key = record_key(module, verification_id);
        let raw = self
            .kv
            .get(&key)?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        decode_handle(&key, &raw)
    }

    /// True only if the record exists and names exactly `handle`.
    pub fn check_ownership(
        &self,
        module: &ModuleKey,
        verification_id: &str,
        handle: &Handle,
    ) -> Result<bool, StoreError> {
        match self.get(module, verification_id) {
            Ok(stored) => Ok(&stored == handle),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn delete(&self, module: &ModuleKey, verification_id: &str) -> Result<(), StoreError> {
        self.kv.delete(&record_key(module, verification_id))
    }

    /// Every record of `handle` for `module`, found by scanning the module's
    /// keys. One handle may hold several verification IDs.
    pub fn records_for_module_handle(
        &self,
        module: &ModuleKey,
        handle: &Handle,
    ) -> Result<Vec<MembershipRecord>, StoreError> {
        Ok(self
            .scan(&format!("{module}-"))?
            .into_iter()
            .filter(|r| &r.module == module && &r.handle == handle)
            .collect())
    }

    /// Every record naming `handle`, across modules.
    pub fn records_for_handle(&self, handle: &Handle) -> Result<Vec<MembershipRecord>, StoreError> {
        Ok(self
            .scan("")?
            .into_iter()
            .filter(|r| &r.handle == handle)
            .collect())
    }

    pub fn all_records(&self) -> Result<Vec<MembershipRecord>, StoreError> {
        self.scan("")
    }

    /// Undecodable values are skipped with a warning so one bad row does not
    /// block every scan.
    fn scan(&self, prefix: &str) -> Result<Vec<MembershipRecord>, StoreError> {
        let mut records = Vec::new();
        for key in self.kv.keys_with_prefix(prefix)? {
            let Some((module, verification_id)) = parse_record_key(&key) else {
                continue;
            };
            let Some(raw) = self.kv.get(&key)? else {
                continue;
            };
            match decode_handle(&key, &raw) {
                Ok(handle) => records.push(MembershipRecord {
                    module,
                    verification_id,
                    handle,
                }),
                Err(e) => warn!(%key, error = %e, "skipping undecodable membership record"),
            }
        }
        Ok(records)
    }
}

fn decode_handle(key: &str, raw: &[u8]) -> Result<Handle, StoreError> {
    let s = std::str::from_utf8(raw)
        .map_err(|e| StoreError::Corruption(format!("{key}: {e}")))?;
    Handle::parse(s).map_err(|e| StoreError::Corruption(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_on_first_dash() {
        let (module, id) = parse_record_key("mvp-a1b2-c3d4").unwrap();
        assert_eq!(module.as_str(), "mvp");
        assert_eq!(id, "a1b2-c3d4");
    }

    #[test]
    fn skips_reserved_and_foreign_keys() {
        assert!(parse_record_key("accessJwt").is_none());
        assert!(parse_record_key("endpoint").is_none());
        assert!(parse_record_key("failure-mvp-alice.bsky.social").is_none());
        assert!(parse_record_key("").is_none());
        assert!(parse_record_key("nodash").is_none());
        assert!(parse_record_key("MVP-123").is_none());
    }

    #[test]
    fn key_layout() {
        let module = ModuleKey::parse("ghstar").unwrap();
        assert_eq!(record_key(&module, "alice"), "ghstar-alice");
    }
}
