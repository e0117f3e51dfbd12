//! Probation tracker — the failure-count state machine.
//!
//! Per (module, handle):
//!
//! ```text
//! Valid --count>0--> Failing --count==2--> Warned --count>=4--> Removed
//! ```
//!
//! A zero report clears the failure record and returns to Valid.
//!
//! The caller reports one count at a time; the tracker persists it, warns
//! once when the warning threshold is first reached, and at the removal
//! threshold deletes the membership records and unwinds every group and the
//! label. Direct messages are best-effort.

use std::sync::Arc;

use badge_groups::{MembershipAssigner, SocialGraphClient};
use badge_modules::{CredentialVerifier, ModuleRegistry};
use badge_naming::NamingResolver;
use badge_store::{FailureStore, MembershipStore};
use badge_types::{Handle, ModuleKey, PolicyParams};
use tracing::{error, info, warn};

use crate::enrollment::unwind;
use crate::messages::{removal_message, warning_message};
use crate::report::{ModuleResult, ValidationResult};
use crate::LifecycleError;

pub struct ProbationTracker {
    registry: Arc<ModuleRegistry>,
    resolver: NamingResolver,
    client: Arc<dyn SocialGraphClient>,
    assigner: Arc<MembershipAssigner>,
    memberships: MembershipStore,
    failures: FailureStore,
    params: PolicyParams,
    site_url: String,
}

impl ProbationTracker {
    pub fn new(
        registry: Arc<ModuleRegistry>,
        client: Arc<dyn SocialGraphClient>,
        assigner: Arc<MembershipAssigner>,
        memberships: MembershipStore,
        failures: FailureStore,
        params: &PolicyParams,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            resolver: NamingResolver::new(params),
            client,
            assigner,
            memberships,
            failures,
            params: params.clone(),
            site_url: site_url.into(),
        }
    }

    /// Apply one failure-count report for `handle` on `module`.
    pub async fn record_result(
        &self,
        handle: &Handle,
        module: &ModuleKey,
        failure_count: u32,
    ) -> Result<ValidationResult, LifecycleError> {
        let verifier = self.registry.get(module.as_str())?;
        let mut result = ModuleResult {
            module_key: module.to_string(),
            is_valid: failure_count == 0,
            failure_count,
            ..ModuleResult::default()
        };

        if failure_count == 0 {
            self.failures.clear(module, handle)?;
            let mut report = ValidationResult::new(handle.as_str());
            report.insert(result);
            return Ok(report);
        }

        let previous = self.failures.get_count(module, handle)?;
        self.failures.set_count(module, handle, failure_count)?;

        // A re-reported count never warns twice.
        if failure_count == self.params.warning_failure_count && previous != failure_count {
            let text = warning_message(module, handle, &self.params, &self.site_url);
            result.message_sent = true;
            result.message_success = self.notify(handle, &text).await;
            info!(%module, %handle, failure_count, "probation warning");
        } else if failure_count == self.params.warning_failure_count {
            info!(%module, %handle, failure_count, "warning already sent for this count");
        }

        if failure_count >= self.params.removal_failure_count {
            result.removed = self.remove(verifier.as_ref(), module, handle).await?;
            if result.removed {
                let text = removal_message(module, handle, &self.params, &self.site_url);
                result.message_sent = true;
                result.message_success = self.notify(handle, &text).await;
            }
            self.failures.clear(module, handle)?;
        }

        let mut report = ValidationResult::new(handle.as_str());
        report.insert(result);
        Ok(report)
    }

    /// Delete every membership record of `handle` for `module`, then unwind
    /// the groups and label once. Unwind failures are logged; the records are
    /// gone either way.
    async fn remove(
        &self,
        verifier: &dyn CredentialVerifier,
        module: &ModuleKey,
        handle: &Handle,
    ) -> Result<bool, LifecycleError> {
        let records = self.memberships.records_for_module_handle(module, handle)?;
        if records.is_empty() {
            warn!(%module, %handle, "removal threshold reached but no membership record");
            return Ok(false);
        }
        for record in &records {
            self.memberships.delete(module, &record.verification_id)?;
            info!(%module, %handle, verification_id = %record.verification_id, "membership removed");
        }

        match self.client.resolve_identity(handle).await {
            Ok(identity) => {
                if let Err(e) = unwind(&self.resolver, &self.assigner, verifier, &identity).await {
                    error!(%module, %handle, error = %e, "failed to unwind groups");
                }
            }
            Err(e) => error!(%module, %handle, error = %e, "cannot resolve identity to unwind"),
        }
        Ok(true)
    }

    async fn notify(&self, handle: &Handle, text: &str) -> bool {
        let did = match self.client.resolve_identity(handle).await {
            Ok(identity) => identity.did,
            Err(e) => {
                warn!(%handle, error = %e, "cannot resolve identity to message");
                return false;
            }
        };
        match self.client.send_direct_message(&did, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%handle, error = %e, "failed to deliver direct message");
                false
            }
        }
    }
}
