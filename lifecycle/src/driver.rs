//! Reconciliation driver — periodic re-validation of enrolled identities.
//!
//! There is no scheduler in here. An external caller triggers a pass; every
//! record is checked against its credential source and the outcome fed to
//! the [`ProbationTracker`] as a failure count: previous + 1 on rejection,
//! error or timeout, 0 on success.
//!
//! The count belongs to a (module, handle) pair, so a pass reports once per
//! pair. A handle holding several verification IDs for one module stays
//! valid while any of them verifies.

use std::collections::BTreeMap;
use std::sync::Arc;

use badge_modules::ModuleRegistry;
use badge_store::{FailureStore, MembershipRecord, MembershipStore};
use badge_types::{Handle, ModuleKey, PolicyParams};
use tracing::{debug, info, warn};

use crate::check::verify_within;
use crate::report::{ModuleResult, ReconcileReport, ValidationResult};
use crate::tracker::ProbationTracker;
use crate::LifecycleError;

pub struct ReconciliationDriver {
    registry: Arc<ModuleRegistry>,
    memberships: MembershipStore,
    failures: FailureStore,
    tracker: Arc<ProbationTracker>,
    params: PolicyParams,
}

impl ReconciliationDriver {
    pub fn new(
        registry: Arc<ModuleRegistry>,
        memberships: MembershipStore,
        failures: FailureStore,
        tracker: Arc<ProbationTracker>,
        params: &PolicyParams,
    ) -> Self {
        Self {
            registry,
            memberships,
            failures,
            tracker,
            params: params.clone(),
        }
    }

    /// Re-validate every membership record.
    pub async fn reconcile_all(&self) -> Result<ReconcileReport, LifecycleError> {
        let records = self.memberships.all_records()?;
        self.reconcile(records).await
    }

    /// Re-validate the records of one handle.
    pub async fn reconcile_handle(&self, handle: &Handle) -> Result<ReconcileReport, LifecycleError> {
        let records = self.memberships.records_for_handle(handle)?;
        self.reconcile(records).await
    }

    async fn reconcile(&self, records: Vec<MembershipRecord>) -> Result<ReconcileReport, LifecycleError> {
        let mut report = ReconcileReport::default();

        for ((module, handle), records) in group_by_pair(records) {
            report.checked += 1;
            let valid = match self.check_any(&records).await {
                Some(valid) => valid,
                None => {
                    report.errors += 1;
                    continue;
                }
            };

            let count = if valid {
                0
            } else {
                match self.failures.get_count(&module, &handle) {
                    Ok(previous) => previous.saturating_add(1),
                    Err(e) => {
                        warn!(%module, %handle, error = %e, "cannot read failure count");
                        report.errors += 1;
                        continue;
                    }
                }
            };

            match self.tracker.record_result(&handle, &module, count).await {
                Ok(result) => {
                    if valid {
                        report.valid += 1;
                    } else {
                        report.failed += 1;
                    }
                    for outcome in result.module_results.values() {
                        if outcome.removed {
                            report.removed += 1;
                        } else if outcome.message_sent {
                            report.warned += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(%module, %handle, error = %e, "failed to record result");
                    report.errors += 1;
                }
            }
        }

        info!(
            checked = report.checked,
            valid = report.valid,
            failed = report.failed,
            warned = report.warned,
            removed = report.removed,
            errors = report.errors,
            "reconciliation pass finished"
        );
        Ok(report)
    }

    /// Current validity and failure count of every module `handle` is
    /// enrolled in. Writes nothing.
    pub async fn status(&self, handle: &Handle) -> Result<ValidationResult, LifecycleError> {
        let mut result = ValidationResult::new(handle.as_str());
        let records = self.memberships.records_for_handle(handle)?;
        for ((module, _), records) in group_by_pair(records) {
            let is_valid = self.check_any(&records).await.unwrap_or(false);
            let failure_count = self.failures.get_count(&module, handle)?;
            result.insert(ModuleResult {
                module_key: module.to_string(),
                is_valid,
                failure_count,
                ..ModuleResult::default()
            });
        }
        Ok(result)
    }

    /// Whether any of the pair's records still verifies. Stops at the first
    /// valid one.
    async fn check_any(&self, records: &[MembershipRecord]) -> Option<bool> {
        for record in records {
            if self.check(record).await? {
                return Some(true);
            }
        }
        Some(false)
    }

    /// `None` when the record's module is no longer registered. Any failure
    /// to reach a verdict counts as invalid.
    async fn check(&self, record: &MembershipRecord) -> Option<bool> {
        let verifier = match self.registry.get(record.module.as_str()) {
            Ok(verifier) => verifier,
            Err(e) => {
                warn!(module = %record.module, error = %e, "skipping record of unknown module");
                return None;
            }
        };
        match verify_within(
            verifier.as_ref(),
            &record.verification_id,
            &record.handle,
            self.params.external_call_timeout,
        )
        .await
        {
            Ok(verdict) => {
                debug!(module = %record.module, handle = %record.handle, valid = verdict.is_verified(), "re-validated");
                Some(verdict.is_verified())
            }
            Err(e) => {
                warn!(module = %record.module, handle = %record.handle, error = %e, "re-validation failed");
                Some(false)
            }
        }
    }
}

/// Records keyed by (module, handle), in key order.
fn group_by_pair(records: Vec<MembershipRecord>) -> BTreeMap<(ModuleKey, Handle), Vec<MembershipRecord>> {
    let mut pairs: BTreeMap<(ModuleKey, Handle), Vec<MembershipRecord>> = BTreeMap::new();
    for record in records {
        pairs
            .entry((record.module.clone(), record.handle.clone()))
            .or_default()
            .push(record);
    }
    pairs
}
