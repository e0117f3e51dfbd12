//! Fundamental types for the badge engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! social-network handles and identities, module keys, timestamps and the clock
//! abstraction, and the fixed policy parameters.

pub mod error;
pub mod handle;
pub mod module_key;
pub mod params;
pub mod time;

pub use error::TypesError;
pub use handle::{Handle, Identity};
pub use module_key::ModuleKey;
pub use params::PolicyParams;
pub use time::{Clock, SystemClock, Timestamp};
