//! Storage for the membership lifecycle.
//!
//! Every backend (LMDB, in-memory for testing) implements [`KvStore`]. The
//! typed stores on top of it own the key layout:
//!
//! - namespace `default`: `"{module}-{verificationId}" -> handle`, plus the
//!   reserved session keys `accessJwt` and `endpoint`
//! - namespace `failures`: `"failure-{module}-{handle}" -> decimal count`

pub mod error;
pub mod failure;
pub mod kv;
pub mod membership;
pub mod session;

pub use error::StoreError;
pub use failure::FailureStore;
pub use kv::KvStore;
pub use membership::{MembershipRecord, MembershipStore};
pub use session::{Session, SessionStore};
