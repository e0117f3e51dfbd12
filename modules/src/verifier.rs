//! The per-module verification capability.

use async_trait::async_trait;
use badge_naming::{Module, Naming, NamingResolver};
use badge_types::Handle;

use crate::error::ModuleError;

/// Outcome of a credential check that reached its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    /// The source answered, and the answer was no. Carries the reason shown
    /// to the user.
    Rejected(String),
}

impl Verdict {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// One implementation per credential scheme.
///
/// `verify` distinguishes a negative answer (`Ok(Verdict::Rejected)`) from a
/// failure to get one (`Err`). Callers that only care about validity treat
/// both as "not verified".
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    fn module(&self) -> &Module;

    async fn verify(&self, verification_id: &str, handle: &Handle)
        -> Result<Verdict, ModuleError>;

    /// The naming tree that applies to this identity. Defaults to the full
    /// module hierarchy; schemes that know which categories an identity holds
    /// narrow it first.
    async fn naming(
        &self,
        resolver: &NamingResolver,
        _verification_id: &str,
        _handle: &Handle,
    ) -> Result<Naming, ModuleError> {
        Ok(resolver.resolve(self.module())?)
    }
}
