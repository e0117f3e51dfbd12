//! LMDB storage backend for the badge engine.
//!
//! Implements [`badge_store::KvStore`] using the `heed` LMDB bindings. Each
//! namespace maps to one named database within a single environment.

pub mod environment;
pub mod error;
pub mod kv;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use kv::LmdbKvStore;
