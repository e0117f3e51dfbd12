//! Initial verification and explicit unverify.
//!
//! Enrollment runs verify, resolve identity, name, assign, then writes the
//! membership record last: the record is only written once the identity
//! holds every group and the label. A failure before that leaves no record,
//! and a retry resumes thanks to idempotent placement.

use std::collections::HashSet;
use std::sync::Arc;

use badge_groups::{GroupLink, MembershipAssigner, SocialGraphClient};
use badge_modules::{CredentialVerifier, ModuleRegistry, Verdict};
use badge_naming::{FlatNaming, NamingResolver};
use badge_store::MembershipStore;
use badge_types::{Handle, Identity, ModuleKey, PolicyParams};
use tracing::{debug, info};

use crate::check::verify_within;
use crate::LifecycleError;

pub struct Enrollment {
    registry: Arc<ModuleRegistry>,
    resolver: NamingResolver,
    client: Arc<dyn SocialGraphClient>,
    assigner: Arc<MembershipAssigner>,
    memberships: MembershipStore,
    blacklist: HashSet<Handle>,
    params: PolicyParams,
}

impl Enrollment {
    pub fn new(
        registry: Arc<ModuleRegistry>,
        client: Arc<dyn SocialGraphClient>,
        assigner: Arc<MembershipAssigner>,
        memberships: MembershipStore,
        blacklist: HashSet<Handle>,
        params: &PolicyParams,
    ) -> Self {
        Self {
            registry,
            resolver: NamingResolver::new(params),
            client,
            assigner,
            memberships,
            blacklist,
            params: params.clone(),
        }
    }

    /// Verify the credential and place the identity into every group of its
    /// naming tree. Returns the group links in node order.
    pub async fn enroll(
        &self,
        module: &ModuleKey,
        verification_id: &str,
        handle: &Handle,
    ) -> Result<Vec<GroupLink>, LifecycleError> {
        let (verifier, verification_id) = self.admit(module, verification_id, handle).await?;

        let identity = self.client.resolve_identity(handle).await?;
        let naming = verifier
            .naming(&self.resolver, verification_id, &identity.handle)
            .await?;
        let links = self
            .assigner
            .assign_all(&naming, &identity, &verifier.module().label)
            .await?;
        self.memberships
            .put(module, verification_id, &identity.handle)?;

        info!(%module, handle = %identity.handle, groups = links.len(), "enrolled");
        Ok(links)
    }

    /// Verify and name without touching any group or record. The returned
    /// links carry the titles that would be assigned and no URLs.
    pub async fn preview(
        &self,
        module: &ModuleKey,
        verification_id: &str,
        handle: &Handle,
    ) -> Result<Vec<GroupLink>, LifecycleError> {
        let (verifier, verification_id) = self.admit(module, verification_id, handle).await?;
        let naming = verifier
            .naming(&self.resolver, verification_id, handle)
            .await?;
        debug!(%module, %handle, "verified without enrolling");
        Ok(naming
            .titles()
            .iter()
            .map(|title| GroupLink::unplaced(title))
            .collect())
    }

    /// Take the identity out of every group of the module and delete its
    /// record. Only the handle the record names may do this.
    pub async fn unenroll(
        &self,
        module: &ModuleKey,
        verification_id: &str,
        handle: &Handle,
    ) -> Result<usize, LifecycleError> {
        let verification_id = require_id(verification_id)?;
        let verifier = self.registry.get(module.as_str())?;
        if !self
            .memberships
            .check_ownership(module, verification_id, handle)?
        {
            return Err(LifecycleError::NotOwner(handle.to_string()));
        }

        let identity = self.client.resolve_identity(handle).await?;
        let removed = unwind(&self.resolver, &self.assigner, verifier.as_ref(), &identity).await?;
        self.memberships.delete(module, verification_id)?;

        info!(%module, %handle, removed, "unenrolled");
        Ok(removed)
    }

    pub fn flat_naming(&self, module: &ModuleKey) -> Result<FlatNaming, LifecycleError> {
        let module = self.registry.module(module.as_str())?;
        Ok(self.resolver.resolve_flat(module)?)
    }

    pub fn explanation(&self, module: &ModuleKey) -> Result<String, LifecycleError> {
        Ok(self
            .registry
            .module(module.as_str())?
            .explanation_text
            .clone())
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    async fn admit<'a>(
        &self,
        module: &ModuleKey,
        verification_id: &'a str,
        handle: &Handle,
    ) -> Result<(Arc<dyn CredentialVerifier>, &'a str), LifecycleError> {
        let verification_id = require_id(verification_id)?;
        if self.blacklist.contains(handle) {
            return Err(LifecycleError::Blacklisted(handle.to_string()));
        }
        let verifier = self.registry.get(module.as_str())?;

        let verdict = verify_within(
            verifier.as_ref(),
            verification_id,
            handle,
            self.params.external_call_timeout,
        )
        .await?;
        match verdict {
            Verdict::Verified => Ok((verifier, verification_id)),
            Verdict::Rejected(reason) => {
                info!(%module, %handle, %reason, "verification rejected");
                Err(LifecycleError::Rejected(reason))
            }
        }
    }
}

/// Undo every group membership and the label of `identity` for the module
/// behind `verifier`, over the module's full naming tree.
pub(crate) async fn unwind(
    resolver: &NamingResolver,
    assigner: &MembershipAssigner,
    verifier: &dyn CredentialVerifier,
    identity: &Identity,
) -> Result<usize, LifecycleError> {
    let module = verifier.module();
    let titles = resolver.resolve(module)?.titles();
    Ok(assigner.remove_all(&titles, identity, &module.label).await?)
}

fn require_id(verification_id: &str) -> Result<&str, LifecycleError> {
    let trimmed = verification_id.trim();
    if trimmed.is_empty() {
        return Err(LifecycleError::InvalidInput("verificationId is required".into()));
    }
    Ok(trimmed)
}
