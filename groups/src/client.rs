//! The social-graph capability.

use async_trait::async_trait;
use badge_types::{Handle, Identity, Timestamp};

use crate::error::GroupError;
use crate::types::{CreatedRecord, List, ListItem, ListPurpose, Page, StarterPack};

/// Thin typed wrappers over the remote protocol, all acting as the operator
/// account. Every call is a fallible remote round trip; none is retried here.
#[async_trait]
pub trait SocialGraphClient: Send + Sync {
    /// One page of the operator's lists.
    async fn list_lists(&self, cursor: Option<&str>) -> Result<Page<List>, GroupError>;

    /// One page of the operator's starter packs.
    async fn list_starter_packs(&self, cursor: Option<&str>)
        -> Result<Page<StarterPack>, GroupError>;

    /// Current member count of a list, read fresh from the provider.
    async fn list_item_count(&self, list_uri: &str) -> Result<u32, GroupError>;

    /// One page of a list's members.
    async fn list_members(
        &self,
        list_uri: &str,
        cursor: Option<&str>,
    ) -> Result<Page<ListItem>, GroupError>;

    async fn create_list(
        &self,
        name: &str,
        description: &str,
        purpose: ListPurpose,
        created_at: Timestamp,
    ) -> Result<CreatedRecord, GroupError>;

    /// Wrap an existing list in a starter-pack record.
    async fn create_starter_pack(
        &self,
        name: &str,
        description: &str,
        list_uri: &str,
        created_at: Timestamp,
    ) -> Result<CreatedRecord, GroupError>;

    async fn add_member(&self, list_uri: &str, did: &str) -> Result<CreatedRecord, GroupError>;

    /// Delete a list-item record.
    async fn remove_member(&self, item_uri: &str) -> Result<(), GroupError>;

    /// Re-write a starter-pack record with a new `updatedAt`. Membership
    /// changes on the backing list do not touch the record by themselves.
    async fn refresh_starter_pack(
        &self,
        pack: &StarterPack,
        updated_at: Timestamp,
    ) -> Result<(), GroupError>;

    /// Look up the DID behind a handle.
    async fn resolve_identity(&self, handle: &Handle) -> Result<Identity, GroupError>;

    /// Idempotent: an identity already carrying the label is left alone.
    async fn set_label(&self, did: &str, label: &str) -> Result<(), GroupError>;

    /// Idempotent: an identity without the label is left alone.
    async fn remove_label(&self, did: &str, label: &str) -> Result<(), GroupError>;

    async fn follow(&self, did: &str) -> Result<(), GroupError>;

    async fn send_direct_message(&self, did: &str, text: &str) -> Result<(), GroupError>;
}
