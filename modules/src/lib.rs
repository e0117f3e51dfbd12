//! Credential modules.
//!
//! A module is one credential scheme (MVP, GitHub Star, Oracle ACE, ...). Each
//! module pairs its static configuration with a [`CredentialVerifier`] that
//! checks a verification ID against the credential's source of truth and
//! derives the naming that applies to that identity. The [`ModuleRegistry`]
//! is the lookup table from module key to verifier, built once at start-up.

pub mod builtin;
pub mod error;
pub mod ghstar;
pub mod registry;
pub mod remote;
pub mod verifier;

pub use error::ModuleError;
pub use ghstar::GitHubStarsVerifier;
pub use registry::ModuleRegistry;
pub use remote::RemoteVerifier;
pub use verifier::{CredentialVerifier, Verdict};
