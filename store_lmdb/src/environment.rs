//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::kv::LmdbKvStore;
use crate::LmdbError;

/// Membership records and the cached session.
pub const DEFAULT_DB: &str = "default";
/// Re-validation failure counters.
pub const FAILURES_DB: &str = "failures";

pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;
const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and both namespace handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    default_db: Database<Str, Bytes>,
    failures_db: Database<Str, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process and the files
        // are not modified by anything but LMDB.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let default_db = env.create_database(&mut wtxn, Some(DEFAULT_DB))?;
        let failures_db = env.create_database(&mut wtxn, Some(FAILURES_DB))?;
        wtxn.commit()?;

        info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            default_db,
            failures_db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `default` namespace.
    pub fn default_store(&self) -> LmdbKvStore {
        LmdbKvStore::new(self.env.clone(), self.default_db)
    }

    /// The `failures` namespace.
    pub fn failure_store(&self) -> LmdbKvStore {
        LmdbKvStore::new(self.env.clone(), self.failures_db)
    }
}
