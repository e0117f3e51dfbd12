//! Membership assigner — places verified identities into groups.
//!
//! For every node of a naming tree the identity lands in exactly one starter
//! pack and in the one list carrying the node's title:
//!
//! - Lists are provisioned ahead of time. A missing list is an error.
//! - Starter packs fill up. Among the packs sharing a title, the identity
//!   stays wherever it already is; otherwise it joins the first pack with
//!   room, and when none has room a new pack with the same title is created.
//!
//! Both placements are idempotent so an interrupted assignment can simply be
//! retried. Nothing is rolled back on failure.

use std::collections::HashSet;
use std::sync::Arc;

use badge_naming::{Naming, NamingNode};
use badge_types::{Clock, Identity, PolicyParams};
use tracing::{debug, info, warn};

use crate::catalog::GroupCatalog;
use crate::client::SocialGraphClient;
use crate::error::GroupError;
use crate::links::GroupLink;
use crate::types::{Groups, ListPurpose, StarterPack, TitleGroups};

/// Groups created by [`MembershipAssigner::provision_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub created_lists: Vec<String>,
    pub created_starter_packs: Vec<String>,
}

pub struct MembershipAssigner {
    client: Arc<dyn SocialGraphClient>,
    catalog: GroupCatalog,
    clock: Arc<dyn Clock>,
    params: PolicyParams,
    /// Handle of the account owning the groups, used in public links.
    owner: String,
    web_base_url: String,
}

impl MembershipAssigner {
    pub fn new(
        client: Arc<dyn SocialGraphClient>,
        clock: Arc<dyn Clock>,
        params: &PolicyParams,
        owner: impl Into<String>,
        web_base_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog: GroupCatalog::new(client.clone()),
            client,
            clock,
            params: params.clone(),
            owner: owner.into(),
            web_base_url: web_base_url.into(),
        }
    }

    pub fn catalog(&self) -> &GroupCatalog {
        &self.catalog
    }

    /// Place `identity` into the starter pack and list of every node of
    /// `naming`, then follow it and issue `label`.
    ///
    /// Returns one starter-pack link and one list link per node, in node
    /// order. Following is best-effort; labelling is not.
    pub async fn assign_all(
        &self,
        naming: &Naming,
        identity: &Identity,
        label: &str,
    ) -> Result<Vec<GroupLink>, GroupError> {
        let groups = self.catalog.list_groups().await?;
        let mut links = Vec::new();

        for node in naming.nodes() {
            let pack_uri = self.place_in_starter_pack(&groups, node, identity).await?;
            links.push(GroupLink::starter_pack(
                &self.web_base_url,
                &self.owner,
                &pack_uri,
                &node.title,
            ));

            let list_uri = self.place_in_list(&groups, &node.title, identity).await?;
            links.push(GroupLink::list(
                &self.web_base_url,
                &self.owner,
                &list_uri,
                &node.title,
            ));
        }

        if let Err(e) = self.client.follow(&identity.did).await {
            warn!(handle = %identity.handle, error = %e, "failed to follow verified identity");
        }

        self.client.set_label(&identity.did, label).await?;
        info!(
            module = %naming.module_key,
            handle = %identity.handle,
            groups = links.len(),
            "assigned identity to groups"
        );
        Ok(links)
    }

    async fn place_in_list(
        &self,
        groups: &Groups,
        title: &str,
        identity: &Identity,
    ) -> Result<String, GroupError> {
        let list = groups
            .list_named(title)
            .ok_or_else(|| GroupError::ListNotFound(title.to_string()))?;

        if self.catalog.find_member(&list.uri, identity).await?.is_some() {
            debug!(%title, handle = %identity.handle, "already on list");
        } else {
            self.client.add_member(&list.uri, &identity.did).await?;
            debug!(%title, handle = %identity.handle, "added to list");
        }
        Ok(list.uri.clone())
    }

    async fn place_in_starter_pack(
        &self,
        groups: &Groups,
        node: &NamingNode,
        identity: &Identity,
    ) -> Result<String, GroupError> {
        let title = node.title.as_str();

        // Membership is checked on every candidate before any capacity
        // decision, so a retry never lands the identity in a second pack.
        let mut selected: Option<&StarterPack> = None;
        for pack in groups.starter_packs_named(title) {
            let count = self.client.list_item_count(&pack.list_uri).await?;
            if self.catalog.find_member(&pack.list_uri, identity).await?.is_some() {
                debug!(%title, handle = %identity.handle, "already in starter pack");
                return Ok(pack.uri.clone());
            }
            if selected.is_none() && self.params.starter_pack_has_room(count) {
                selected = Some(pack);
            } else if !self.params.starter_pack_has_room(count) {
                debug!(%title, uri = %pack.uri, count, "starter pack is full");
            }
        }

        // Re-read the count right before committing. Concurrent assignments
        // can still overshoot; this narrows the window.
        let reusable = match selected {
            Some(pack) => self.has_room(pack).await?.then(|| pack.clone()),
            None => None,
        };
        let pack = match reusable {
            Some(pack) => pack,
            None => self.create_starter_pack(node).await?,
        };

        self.client.add_member(&pack.list_uri, &identity.did).await?;
        self.client
            .refresh_starter_pack(&pack, self.clock.now())
            .await?;
        debug!(%title, uri = %pack.uri, handle = %identity.handle, "added to starter pack");
        Ok(pack.uri)
    }

    async fn has_room(&self, pack: &StarterPack) -> Result<bool, GroupError> {
        let count = self.client.list_item_count(&pack.list_uri).await?;
        Ok(self.params.starter_pack_has_room(count))
    }

    /// Two steps: the backing list, then the starter-pack record around it.
    async fn create_starter_pack(&self, node: &NamingNode) -> Result<StarterPack, GroupError> {
        let created_at = self.clock.now();
        let list = self
            .client
            .create_list(
                &node.title,
                &node.description,
                ListPurpose::Reference,
                created_at,
            )
            .await?;
        let record = self
            .client
            .create_starter_pack(&node.title, &node.description, &list.uri, created_at)
            .await?;
        info!(title = %node.title, uri = %record.uri, "created starter pack");
        Ok(StarterPack {
            uri: record.uri,
            list_uri: list.uri,
            name: node.title.clone(),
            description: node.description.clone(),
            created_at: created_at.to_rfc3339(),
        })
    }

    /// Take `identity` out of every group titled with one of `titles`, then
    /// retract `label`.
    ///
    /// Keeps going past individual failures so one broken group does not
    /// strand the identity in all the others; the first error is returned
    /// once every group has been tried. Returns the number of memberships
    /// removed.
    pub async fn remove_all(
        &self,
        titles: &[String],
        identity: &Identity,
        label: &str,
    ) -> Result<usize, GroupError> {
        let titles: HashSet<&str> = titles.iter().map(String::as_str).collect();
        let groups = self.catalog.list_groups().await?;
        let mut removed = 0;
        let mut first_error: Option<GroupError> = None;

        for list in groups
            .curated_lists()
            .filter(|l| titles.contains(l.name.as_str()))
        {
            match self.remove_from(&list.uri, identity).await {
                Ok(true) => {
                    removed += 1;
                    debug!(title = %list.name, handle = %identity.handle, "removed from list");
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(title = %list.name, error = %e, "failed to remove from list");
                    first_error.get_or_insert(e);
                }
            }
        }

        for pack in groups
            .starter_packs
            .iter()
            .filter(|sp| titles.contains(sp.name.as_str()))
        {
            let result = match self.remove_from(&pack.list_uri, identity).await {
                Ok(true) => self
                    .client
                    .refresh_starter_pack(pack, self.clock.now())
                    .await
                    .map(|_| true),
                other => other,
            };
            match result {
                Ok(true) => {
                    removed += 1;
                    debug!(title = %pack.name, handle = %identity.handle, "removed from starter pack");
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(title = %pack.name, error = %e, "failed to remove from starter pack");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Err(e) = self.client.remove_label(&identity.did, label).await {
            warn!(%label, handle = %identity.handle, error = %e, "failed to remove label");
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!(handle = %identity.handle, removed, "removed identity from groups");
                Ok(removed)
            }
        }
    }

    async fn remove_from(&self, list_uri: &str, identity: &Identity) -> Result<bool, GroupError> {
        match self.catalog.find_member(list_uri, identity).await? {
            Some(item) => {
                self.client.remove_member(&item.uri).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Create every list and starter pack of `naming` that does not exist
    /// yet. Existing groups are left untouched.
    pub async fn provision_all(&self, naming: &Naming) -> Result<ProvisionReport, GroupError> {
        let groups = self.catalog.list_groups().await?;
        let mut report = ProvisionReport::default();

        for node in naming.nodes() {
            if groups.starter_packs_named(&node.title).next().is_none() {
                self.create_starter_pack(node).await?;
                report.created_starter_packs.push(node.title.clone());
            }
            if groups.list_named(&node.title).is_none() {
                let record = self
                    .client
                    .create_list(
                        &node.title,
                        &node.description,
                        ListPurpose::Curation,
                        self.clock.now(),
                    )
                    .await?;
                info!(title = %node.title, uri = %record.uri, "created list");
                report.created_lists.push(node.title.clone());
            }
        }
        Ok(report)
    }

    /// The list and every starter pack carrying `title`.
    pub async fn groups_for_title(&self, title: &str) -> Result<TitleGroups, GroupError> {
        let groups = self.catalog.list_groups().await?;
        Ok(TitleGroups {
            list: groups
                .list_named(title)
                .map(|l| GroupLink::list(&self.web_base_url, &self.owner, &l.uri, title)),
            starter_packs: groups
                .starter_packs_named(title)
                .map(|sp| GroupLink::starter_pack(&self.web_base_url, &self.owner, &sp.uri, title))
                .collect(),
        })
    }
}
