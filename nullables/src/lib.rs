//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the badge engine (clock, key-value storage,
//! the social graph, credential sources) sits behind a trait. This crate
//! provides in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod graph;
pub mod kv;
pub mod verifier;

pub use clock::NullClock;
pub use graph::{GraphOp, NullSocialGraph, SentMessage, OPERATOR_DID};
pub use kv::NullKvStore;
pub use verifier::NullVerifier;
