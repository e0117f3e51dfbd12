//! Credential checks bounded by the external call timeout.

use std::time::Duration;

use badge_modules::{CredentialVerifier, Verdict};
use badge_types::Handle;

use crate::LifecycleError;

pub(crate) async fn verify_within(
    verifier: &dyn CredentialVerifier,
    verification_id: &str,
    handle: &Handle,
    timeout: Duration,
) -> Result<Verdict, LifecycleError> {
    match tokio::time::timeout(timeout, verifier.verify(verification_id, handle)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(LifecycleError::Timeout(timeout.as_secs())),
    }
}
