//! Nullable social graph — an in-memory operator account.
//!
//! Lists, starter packs, labels, follows and direct messages live in one
//! mutex-guarded state. Enumerations paginate with a configurable page size
//! so cursor handling gets exercised. A starter pack's backing list can be
//! seeded with anonymous "padding" members to simulate a nearly full pack
//! without materialising every row.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use badge_groups::{
    CreatedRecord, GroupError, List, ListItem, ListPurpose, Page, SocialGraphClient, StarterPack,
};
use badge_types::{Handle, Identity, Timestamp};

pub const OPERATOR_DID: &str = "did:plc:operator";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub did: String,
    pub text: String,
}

/// Operations that can be made to fail on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum GraphOp {
    AddMember,
    RemoveMember,
    CreateList,
    CreateStarterPack,
    SetLabel,
    RemoveLabel,
    Follow,
    SendMessage,
    ResolveIdentity,
    ListGroups,
}

struct NullList {
    uri: String,
    name: String,
    description: String,
    purpose: ListPurpose,
    padding: u32,
    members: Vec<ListItem>,
}

impl NullList {
    fn item_count(&self) -> u32 {
        self.padding + self.members.len() as u32
    }
}

struct GraphState {
    next_id: u64,
    page_size: usize,
    lists: Vec<NullList>,
    starter_packs: Vec<StarterPack>,
    profiles: HashMap<String, String>,
    labels: BTreeMap<String, BTreeSet<String>>,
    follows: Vec<String>,
    messages: Vec<SentMessage>,
    refreshed: Vec<String>,
    failing: BTreeSet<GraphOp>,
}

impl GraphState {
    fn next_uri(&mut self, collection: &str) -> String {
        self.next_id += 1;
        format!("at://{OPERATOR_DID}/{collection}/r{}", self.next_id)
    }

    fn check(&self, op: GraphOp) -> Result<(), GroupError> {
        if self.failing.contains(&op) {
            Err(GroupError::RequestFailed(format!("injected failure: {op:?}")))
        } else {
            Ok(())
        }
    }

    fn list(&self, uri: &str) -> Result<&NullList, GroupError> {
        self.lists
            .iter()
            .find(|l| l.uri == uri)
            .ok_or_else(|| GroupError::RequestFailed(format!("list not found: {uri}")))
    }

    fn list_mut(&mut self, uri: &str) -> Result<&mut NullList, GroupError> {
        self.lists
            .iter_mut()
            .find(|l| l.uri == uri)
            .ok_or_else(|| GroupError::RequestFailed(format!("list not found: {uri}")))
    }

    fn insert_list(&mut self, name: &str, description: &str, purpose: ListPurpose) -> String {
        let uri = self.next_uri("app.bsky.graph.list");
        self.lists.push(NullList {
            uri: uri.clone(),
            name: name.to_string(),
            description: description.to_string(),
            purpose,
            padding: 0,
            members: Vec::new(),
        });
        uri
    }

    fn page<T: Clone>(&self, items: &[T], cursor: Option<&str>) -> Page<T> {
        let start = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        let slice = items.get(start..end).unwrap_or_default().to_vec();
        let cursor = (end < items.len()).then(|| end.to_string());
        Page { items: slice, cursor }
    }
}

pub struct NullSocialGraph {
    state: Mutex<GraphState>,
}

impl Default for NullSocialGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NullSocialGraph {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GraphState {
                next_id: 0,
                page_size: 100,
                lists: Vec::new(),
                starter_packs: Vec::new(),
                profiles: HashMap::new(),
                labels: BTreeMap::new(),
                follows: Vec::new(),
                messages: Vec::new(),
                refreshed: Vec::new(),
                failing: BTreeSet::new(),
            }),
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().unwrap().page_size = page_size.max(1);
        self
    }

    /// Seed a standalone curated list. Returns its URI.
    pub fn add_list(&self, name: &str) -> String {
        self.state
            .lock()
            .unwrap()
            .insert_list(name, "", ListPurpose::Curation)
    }

    /// Seed a starter pack whose backing list already holds `member_count`
    /// anonymous members. Returns the pack's URI.
    pub fn add_starter_pack(&self, name: &str, member_count: u32) -> String {
        let mut state = self.state.lock().unwrap();
        let list_uri = state.insert_list(name, "", ListPurpose::Reference);
        if let Ok(list) = state.list_mut(&list_uri) {
            list.padding = member_count;
        }
        let uri = state.next_uri("app.bsky.graph.starterpack");
        state.starter_packs.push(StarterPack {
            uri: uri.clone(),
            list_uri,
            name: name.to_string(),
            description: String::new(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        });
        uri
    }

    /// Seed every title as both a curated list and a starter pack.
    pub fn provision(&self, titles: &[String]) {
        for title in titles {
            self.add_list(title);
            self.add_starter_pack(title, 0);
        }
    }

    /// Map a handle to a DID. Unmapped handles resolve to `did:plc:{handle}`.
    pub fn add_profile(&self, handle: &str, did: &str) {
        self.state
            .lock()
            .unwrap()
            .profiles
            .insert(handle.to_lowercase(), did.to_string());
    }

    pub fn fail(&self, op: GraphOp, failing: bool) {
        let mut state = self.state.lock().unwrap();
        if failing {
            state.failing.insert(op);
        } else {
            state.failing.remove(&op);
        }
    }

    pub fn lists(&self) -> Vec<List> {
        let state = self.state.lock().unwrap();
        state.lists.iter().map(to_list).collect()
    }

    pub fn starter_packs(&self) -> Vec<StarterPack> {
        self.state.lock().unwrap().starter_packs.clone()
    }

    pub fn starter_pack(&self, uri: &str) -> Option<StarterPack> {
        self.starter_packs().into_iter().find(|sp| sp.uri == uri)
    }

    pub fn starter_packs_named(&self, name: &str) -> Vec<StarterPack> {
        self.starter_packs()
            .into_iter()
            .filter(|sp| sp.name == name)
            .collect()
    }

    /// Curated list with `name`, if any.
    pub fn list_named(&self, name: &str) -> Option<List> {
        self.lists()
            .into_iter()
            .find(|l| l.name == name && l.purpose == Some(ListPurpose::Curation))
    }

    /// Real (non-padding) members of a list.
    pub fn members(&self, list_uri: &str) -> Vec<ListItem> {
        let state = self.state.lock().unwrap();
        state
            .list(list_uri)
            .map(|l| l.members.clone())
            .unwrap_or_default()
    }

    pub fn is_member(&self, list_uri: &str, did: &str) -> bool {
        self.members(list_uri).iter().any(|m| m.did == did)
    }

    pub fn labels(&self, did: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .labels
            .get(did)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn follows(&self) -> Vec<String> {
        self.state.lock().unwrap().follows.clone()
    }

    pub fn messages(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().messages.clone()
    }

    /// Starter-pack URIs in the order they were refreshed.
    pub fn refreshed(&self) -> Vec<String> {
        self.state.lock().unwrap().refreshed.clone()
    }
}

fn to_list(l: &NullList) -> List {
    List {
        uri: l.uri.clone(),
        name: l.name.clone(),
        description: l.description.clone(),
        purpose: Some(l.purpose),
        item_count: l.item_count(),
    }
}

#[async_trait]
impl SocialGraphClient for NullSocialGraph {
    async fn list_lists(&self, cursor: Option<&str>) -> Result<Page<List>, GroupError> {
        let state = self.state.lock().unwrap();
        state.check(GraphOp::ListGroups)?;
        let lists: Vec<List> = state.lists.iter().map(to_list).collect();
        Ok(state.page(&lists, cursor))
    }

    async fn list_starter_packs(
        &self,
        cursor: Option<&str>,
    ) -> Result<Page<StarterPack>, GroupError> {
        let state = self.state.lock().unwrap();
        state.check(GraphOp::ListGroups)?;
        Ok(state.page(&state.starter_packs, cursor))
    }

    async fn list_item_count(&self, list_uri: &str) -> Result<u32, GroupError> {
        let state = self.state.lock().unwrap();
        Ok(state.list(list_uri)?.item_count())
    }

    async fn list_members(
        &self,
        list_uri: &str,
        cursor: Option<&str>,
    ) -> Result<Page<ListItem>, GroupError> {
        let state = self.state.lock().unwrap();
        let members = state.list(list_uri)?.members.clone();
        Ok(state.page(&members, cursor))
    }

    async fn create_list(
        &self,
        name: &str,
        description: &str,
        purpose: ListPurpose,
        _created_at: Timestamp,
    ) -> Result<CreatedRecord, GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::CreateList)?;
        let uri = state.insert_list(name, description, purpose);
        Ok(CreatedRecord {
            uri,
            cid: "cid".to_string(),
        })
    }

    async fn create_starter_pack(
        &self,
        name: &str,
        description: &str,
        list_uri: &str,
        created_at: Timestamp,
    ) -> Result<CreatedRecord, GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::CreateStarterPack)?;
        state.list(list_uri)?;
        let uri = state.next_uri("app.bsky.graph.starterpack");
        state.starter_packs.push(StarterPack {
            uri: uri.clone(),
            list_uri: list_uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: created_at.to_rfc3339(),
        });
        Ok(CreatedRecord {
            uri,
            cid: "cid".to_string(),
        })
    }

    async fn add_member(&self, list_uri: &str, did: &str) -> Result<CreatedRecord, GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::AddMember)?;
        let uri = state.next_uri("app.bsky.graph.listitem");
        let handle = state
            .profiles
            .iter()
            .find(|(_, d)| d.as_str() == did)
            .map(|(h, _)| h.clone())
            .unwrap_or_default();
        state.list_mut(list_uri)?.members.push(ListItem {
            uri: uri.clone(),
            did: did.to_string(),
            handle,
        });
        Ok(CreatedRecord {
            uri,
            cid: "cid".to_string(),
        })
    }

    async fn remove_member(&self, item_uri: &str) -> Result<(), GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::RemoveMember)?;
        for list in &mut state.lists {
            list.members.retain(|m| m.uri != item_uri);
        }
        Ok(())
    }

    async fn refresh_starter_pack(
        &self,
        pack: &StarterPack,
        _updated_at: Timestamp,
    ) -> Result<(), GroupError> {
        self.state.lock().unwrap().refreshed.push(pack.uri.clone());
        Ok(())
    }

    async fn resolve_identity(&self, handle: &Handle) -> Result<Identity, GroupError> {
        let state = self.state.lock().unwrap();
        state.check(GraphOp::ResolveIdentity)?;
        let did = state
            .profiles
            .get(handle.as_str())
            .cloned()
            .unwrap_or_else(|| format!("did:plc:{}", handle.as_str().replace('.', "-")));
        Ok(Identity::new(handle.clone(), did))
    }

    async fn set_label(&self, did: &str, label: &str) -> Result<(), GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::SetLabel)?;
        state
            .labels
            .entry(did.to_string())
            .or_default()
            .insert(label.to_string());
        Ok(())
    }

    async fn remove_label(&self, did: &str, label: &str) -> Result<(), GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::RemoveLabel)?;
        if let Some(labels) = state.labels.get_mut(did) {
            labels.remove(label);
        }
        Ok(())
    }

    async fn follow(&self, did: &str) -> Result<(), GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::Follow)?;
        if !state.follows.iter().any(|d| d == did) {
            state.follows.push(did.to_string());
        }
        Ok(())
    }

    async fn send_direct_message(&self, did: &str, text: &str) -> Result<(), GroupError> {
        let mut state = self.state.lock().unwrap();
        state.check(GraphOp::SendMessage)?;
        state.messages.push(SentMessage {
            did: did.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
