//! Read-through view of the operator's groups.

use std::sync::Arc;

use badge_types::Identity;
use tracing::debug;

use crate::client::SocialGraphClient;
use crate::error::GroupError;
use crate::types::{Groups, ListItem};

/// No caching across calls: every operation sees the provider's current
/// state, including changes made by concurrent requests.
#[derive(Clone)]
pub struct GroupCatalog {
    client: Arc<dyn SocialGraphClient>,
}

impl GroupCatalog {
    pub fn new(client: Arc<dyn SocialGraphClient>) -> Self {
        Self { client }
    }

    /// Every list and starter pack, following cursors until exhausted.
    pub async fn list_groups(&self) -> Result<Groups, GroupError> {
        let mut groups = Groups::default();

        let mut cursor: Option<String> = None;
        loop {
            let page = self.client.list_lists(cursor.as_deref()).await?;
            groups.lists.extend(page.items);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        let mut cursor: Option<String> = None;
        loop {
            let page = self.client.list_starter_packs(cursor.as_deref()).await?;
            groups.starter_packs.extend(page.items);
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        debug!(
            lists = groups.lists.len(),
            starter_packs = groups.starter_packs.len(),
            "listed groups"
        );
        Ok(groups)
    }

    /// The list-item row for `identity` on `list_uri`, matched by DID or handle.
    pub async fn find_member(
        &self,
        list_uri: &str,
        identity: &Identity,
    ) -> Result<Option<ListItem>, GroupError> {
        let mut cursor: Option<String> = None;
        loop {
            let page = self.client.list_members(list_uri, cursor.as_deref()).await?;
            if let Some(item) = page
                .items
                .into_iter()
                .find(|item| identity.matches(&item.handle, &item.did))
            {
                return Ok(Some(item));
            }
            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => return Ok(None),
            }
        }
    }
}
