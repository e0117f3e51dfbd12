//! LMDB implementation of KvStore.
//!
//! One LMDB database per namespace, UTF-8 keys, raw byte values. Every call
//! runs in its own transaction.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use badge_store::{KvStore, StoreError};

use crate::LmdbError;

#[derive(Clone)]
pub struct LmdbKvStore {
    env: Arc<Env>,
    db: Database<Str, Bytes>,
}

impl LmdbKvStore {
    pub(crate) fn new(env: Arc<Env>, db: Database<Str, Bytes>) -> Self {
        Self { env, db }
    }
}

impl KvStore for LmdbKvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        // LMDB rejects zero-length keys, so an empty prefix is a full scan.
        if prefix.is_empty() {
            let iter = self.db.iter(&rtxn).map_err(LmdbError::from)?;
            collect_keys(iter)
        } else {
            let iter = self
                .db
                .prefix_iter(&rtxn, prefix)
                .map_err(LmdbError::from)?;
            collect_keys(iter)
        }
    }
}

fn collect_keys<'txn, I>(iter: I) -> Result<Vec<String>, StoreError>
where
    I: Iterator<Item = heed::Result<(&'txn str, &'txn [u8])>>,
{
    let mut keys = Vec::new();
    for result in iter {
        let (key, _) = result.map_err(LmdbError::from)?;
        keys.push(key.to_string());
    }
    Ok(keys)
}
