//! Membership lifecycle.
//!
//! - [`Enrollment`] verifies a credential, assigns groups and writes the
//!   membership record; it also previews and unverifies.
//! - [`ProbationTracker`] turns failure-count reports into warnings and
//!   removals.
//! - [`ReconciliationDriver`] re-validates enrolled identities and reports
//!   to the tracker.
//!
//! [`Engine`] wires the three over one registry, social graph and store.

mod check;
pub mod driver;
pub mod enrollment;
pub mod error;
pub mod messages;
pub mod report;
pub mod tracker;

use std::collections::HashSet;
use std::sync::Arc;

use badge_groups::{MembershipAssigner, SocialGraphClient};
use badge_modules::ModuleRegistry;
use badge_store::{FailureStore, KvStore, MembershipStore};
use badge_types::{Clock, Handle, PolicyParams};

pub use driver::ReconciliationDriver;
pub use enrollment::Enrollment;
pub use error::LifecycleError;
pub use report::{Action, ModuleResult, ReconcileReport, ValidationResult};
pub use tracker::ProbationTracker;

/// Deployment-specific settings of the engine.
#[derive(Clone, Debug, Default)]
pub struct EngineSettings {
    /// Handle of the operator account, used in public group links.
    pub operator_handle: String,
    pub web_base_url: String,
    /// Where users re-apply; quoted in probation messages.
    pub site_url: String,
    pub blacklist: HashSet<Handle>,
}

pub struct Engine {
    pub enrollment: Enrollment,
    pub tracker: Arc<ProbationTracker>,
    pub driver: ReconciliationDriver,
    pub assigner: Arc<MembershipAssigner>,
}

impl Engine {
    /// `memberships` is the `default` namespace, `failures` the `failures`
    /// namespace.
    pub fn new(
        registry: Arc<ModuleRegistry>,
        client: Arc<dyn SocialGraphClient>,
        memberships: Arc<dyn KvStore>,
        failures: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        params: &PolicyParams,
        settings: EngineSettings,
    ) -> Self {
        let memberships = MembershipStore::new(memberships);
        let failures = FailureStore::new(failures);
        let assigner = Arc::new(MembershipAssigner::new(
            client.clone(),
            clock,
            params,
            settings.operator_handle,
            settings.web_base_url,
        ));
        let tracker = Arc::new(ProbationTracker::new(
            registry.clone(),
            client.clone(),
            assigner.clone(),
            memberships.clone(),
            failures.clone(),
            params,
            settings.site_url,
        ));
        let driver = ReconciliationDriver::new(
            registry.clone(),
            memberships.clone(),
            failures,
            tracker.clone(),
            params,
        );
        let enrollment = Enrollment::new(
            registry,
            client,
            assigner.clone(),
            memberships,
            settings.blacklist,
            params,
        );
        Self {
            enrollment,
            tracker,
            driver,
            assigner,
        }
    }
}
