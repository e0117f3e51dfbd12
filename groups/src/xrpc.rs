//! [`SocialGraphClient`] over XRPC.
//!
//! Reads go to the app view through the operator's PDS, writes are
//! `com.atproto.repo.*` record operations on the operator's repository.
//! Label reads and writes are proxied to the labeler service, direct
//! messages to the chat service. A 401 drops the session and the call is
//! repeated once with a fresh login.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use badge_store::SessionStore;
use badge_types::{Clock, Handle, Identity, Timestamp};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::client::SocialGraphClient;
use crate::error::GroupError;
use crate::links::rkey;
use crate::session::SessionManager;
use crate::types::{CreatedRecord, List, ListItem, ListPurpose, Page, StarterPack};

const PAGE_LIMIT: &str = "100";

const LIST_COLLECTION: &str = "app.bsky.graph.list";
const LIST_ITEM_COLLECTION: &str = "app.bsky.graph.listitem";
const STARTER_PACK_COLLECTION: &str = "app.bsky.graph.starterpack";
const FOLLOW_COLLECTION: &str = "app.bsky.graph.follow";

#[derive(Clone)]
pub struct XrpcConfig {
    /// Entryway used for login, e.g. `https://bsky.social`.
    pub service_url: String,
    pub operator_handle: String,
    pub operator_did: String,
    pub password: String,
    pub labeler_did: String,
    pub chat_service_did: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for XrpcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XrpcConfig")
            .field("service_url", &self.service_url)
            .field("operator_handle", &self.operator_handle)
            .field("operator_did", &self.operator_did)
            .field("password", &"<redacted>")
            .field("labeler_did", &self.labeler_did)
            .field("chat_service_did", &self.chat_service_did)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct XrpcClient {
    http: reqwest::Client,
    config: XrpcConfig,
    sessions: SessionManager,
    clock: Arc<dyn Clock>,
}

impl XrpcClient {
    pub fn new(config: XrpcConfig, sessions: SessionStore, clock: Arc<dyn Clock>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .unwrap_or_default();
        let sessions = SessionManager::new(
            http.clone(),
            config.service_url.clone(),
            config.operator_handle.clone(),
            config.password.clone(),
            sessions,
        );
        Self {
            http,
            config,
            sessions,
            clock,
        }
    }

    pub fn config(&self) -> &XrpcConfig {
        &self.config
    }

    async fn call(
        &self,
        method: Method,
        nsid: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        headers: &[(&'static str, String)],
    ) -> Result<Value, GroupError> {
        for attempt in 0..2 {
            let session = self.sessions.current().await?;
            let url = format!("{}/xrpc/{nsid}", session.endpoint.trim_end_matches('/'));

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&session.access_jwt)
                .query(query);
            for (name, value) in headers {
                request = request.header(*name, value);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && attempt == 0 {
                debug!(%nsid, "session rejected, logging in again");
                self.sessions.invalidate().await;
                continue;
            }
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(if status == StatusCode::UNAUTHORIZED {
                    GroupError::Unauthorized(format!("{nsid}: {text}"))
                } else {
                    GroupError::RequestFailed(format!("{nsid}: HTTP status {status}: {text}"))
                });
            }

            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes)
                .map_err(|e| GroupError::InvalidResponse(format!("{nsid}: {e}")));
        }
        Err(GroupError::Unauthorized(nsid.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        nsid: &str,
        query: &[(&str, &str)],
        headers: &[(&'static str, String)],
    ) -> Result<T, GroupError> {
        let value = self.call(Method::GET, nsid, query, None, headers).await?;
        serde_json::from_value(value).map_err(|e| GroupError::InvalidResponse(format!("{nsid}: {e}")))
    }

    async fn post(
        &self,
        nsid: &str,
        body: &Value,
        headers: &[(&'static str, String)],
    ) -> Result<Value, GroupError> {
        self.call(Method::POST, nsid, &[], Some(body), headers).await
    }

    async fn create_record(&self, collection: &str, record: Value) -> Result<CreatedRecord, GroupError> {
        let value = self
            .post(
                "com.atproto.repo.createRecord",
                &json!({
                    "repo": self.config.operator_did,
                    "collection": collection,
                    "record": record,
                }),
                &[],
            )
            .await?;
        let created: CreatedRecordView = serde_json::from_value(value)
            .map_err(|e| GroupError::InvalidResponse(format!("createRecord: {e}")))?;
        Ok(CreatedRecord {
            uri: created.uri,
            cid: created.cid,
        })
    }

    fn labeler_headers(&self) -> [(&'static str, String); 2] {
        [
            ("atproto-accept-labelers", format!("{};redact", self.config.labeler_did)),
            ("atproto-proxy", format!("{}#atproto_labeler", self.config.operator_did)),
        ]
    }

    async fn labels_of(&self, did: &str) -> Result<Vec<String>, GroupError> {
        let repo: ModerationRepoView = self
            .get(
                "tools.ozone.moderation.getRepo",
                &[("did", did)],
                &self.labeler_headers(),
            )
            .await?;
        Ok(repo.labels.into_iter().map(|l| l.val).collect())
    }

    async fn emit_label_event(&self, did: &str, create: &[&str], negate: &[&str]) -> Result<(), GroupError> {
        let headers = self.labeler_headers();
        let subject = json!({ "$type": "com.atproto.admin.defs#repoRef", "did": did });

        self.post(
            "tools.ozone.moderation.emitEvent",
            &json!({
                "subject": subject,
                "createdBy": self.config.operator_did,
                "subjectBlobCids": [],
                "event": {
                    "$type": "tools.ozone.moderation.defs#modEventLabel",
                    "createLabelVals": create,
                    "negateLabelVals": negate,
                },
            }),
            &headers,
        )
        .await?;

        // Closes any report the label event opened; failing it leaves the
        // label in place.
        if let Err(e) = self
            .post(
                "tools.ozone.moderation.emitEvent",
                &json!({
                    "subject": subject,
                    "createdBy": self.config.operator_did,
                    "subjectBlobCids": [],
                    "event": { "$type": "tools.ozone.moderation.defs#modEventAcknowledge" },
                }),
                &headers,
            )
            .await
        {
            warn!(%did, error = %e, "failed to acknowledge label event");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListView {
    uri: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    purpose: String,
    #[serde(default)]
    list_item_count: u32,
}

impl From<ListView> for List {
    fn from(v: ListView) -> Self {
        List {
            purpose: ListPurpose::from_wire(&v.purpose),
            uri: v.uri,
            name: v.name,
            description: v.description,
            item_count: v.list_item_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListsView {
    lists: Vec<ListView>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarterPackRecordView {
    name: String,
    #[serde(default)]
    description: String,
    list: String,
    #[serde(default)]
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct StarterPackView {
    uri: String,
    record: StarterPackRecordView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarterPacksView {
    starter_packs: Vec<StarterPackView>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubjectView {
    did: String,
    #[serde(default)]
    handle: String,
}

#[derive(Debug, Deserialize)]
struct ItemView {
    uri: String,
    subject: SubjectView,
}

#[derive(Debug, Deserialize)]
struct ListDetailView {
    list: ListView,
    #[serde(default)]
    items: Vec<ItemView>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedRecordView {
    uri: String,
    #[serde(default)]
    cid: String,
}

#[derive(Debug, Deserialize)]
struct ProfileView {
    did: String,
    handle: String,
}

#[derive(Debug, Deserialize)]
struct LabelView {
    val: String,
}

#[derive(Debug, Deserialize)]
struct ModerationRepoView {
    #[serde(default)]
    labels: Vec<LabelView>,
}

#[derive(Debug, Deserialize)]
struct ConvoView {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ConvoForMembersView {
    convo: ConvoView,
}

/// `fixed` plus the cursor, which is left out entirely on the first page.
fn paged_query<'a>(fixed: &[(&'a str, &'a str)], cursor: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
    let mut query = fixed.to_vec();
    if let Some(cursor) = cursor {
        query.push(("cursor", cursor));
    }
    query
}

#[async_trait]
impl SocialGraphClient for XrpcClient {
    async fn list_lists(&self, cursor: Option<&str>) -> Result<Page<List>, GroupError> {
        let view: ListsView = self
            .get(
                "app.bsky.graph.getLists",
                &paged_query(
                    &[
                        ("actor", self.config.operator_did.as_str()),
                        ("limit", PAGE_LIMIT),
                    ],
                    cursor,
                ),
                &[],
            )
            .await?;
        Ok(Page {
            items: view.lists.into_iter().map(List::from).collect(),
            cursor: view.cursor,
        })
    }

    async fn list_starter_packs(
        &self,
        cursor: Option<&str>,
    ) -> Result<Page<StarterPack>, GroupError> {
        let view: StarterPacksView = self
            .get(
                "app.bsky.graph.getActorStarterPacks",
                &paged_query(
                    &[
                        ("actor", self.config.operator_did.as_str()),
                        ("limit", PAGE_LIMIT),
                    ],
                    cursor,
                ),
                &[],
            )
            .await?;
        Ok(Page {
            items: view
                .starter_packs
                .into_iter()
                .map(|sp| StarterPack {
                    uri: sp.uri,
                    list_uri: sp.record.list,
                    name: sp.record.name,
                    description: sp.record.description,
                    created_at: sp.record.created_at,
                })
                .collect(),
            cursor: view.cursor,
        })
    }

    async fn list_item_count(&self, list_uri: &str) -> Result<u32, GroupError> {
        let view: ListDetailView = self
            .get(
                "app.bsky.graph.getList",
                &[("list", list_uri), ("limit", "1")],
                &[],
            )
            .await?;
        Ok(view.list.list_item_count)
    }

    async fn list_members(
        &self,
        list_uri: &str,
        cursor: Option<&str>,
    ) -> Result<Page<ListItem>, GroupError> {
        let view: ListDetailView = self
            .get(
                "app.bsky.graph.getList",
                &paged_query(&[("list", list_uri), ("limit", PAGE_LIMIT)], cursor),
                &[],
            )
            .await?;
        Ok(Page {
            items: view
                .items
                .into_iter()
                .map(|item| ListItem {
                    uri: item.uri,
                    did: item.subject.did,
                    handle: item.subject.handle,
                })
                .collect(),
            cursor: view.cursor,
        })
    }

    async fn create_list(
        &self,
        name: &str,
        description: &str,
        purpose: ListPurpose,
        created_at: Timestamp,
    ) -> Result<CreatedRecord, GroupError> {
        self.create_record(
            LIST_COLLECTION,
            json!({
                "$type": LIST_COLLECTION,
                "name": name,
                "description": description,
                "purpose": purpose.as_str(),
                "createdAt": created_at.to_rfc3339(),
            }),
        )
        .await
    }

    async fn create_starter_pack(
        &self,
        name: &str,
        description: &str,
        list_uri: &str,
        created_at: Timestamp,
    ) -> Result<CreatedRecord, GroupError> {
        self.create_record(
            STARTER_PACK_COLLECTION,
            json!({
                "$type": STARTER_PACK_COLLECTION,
                "name": name,
                "description": description,
                "list": list_uri,
                "feeds": [],
                "createdAt": created_at.to_rfc3339(),
            }),
        )
        .await
    }

    async fn add_member(&self, list_uri: &str, did: &str) -> Result<CreatedRecord, GroupError> {
        self.create_record(
            LIST_ITEM_COLLECTION,
            json!({
                "$type": LIST_ITEM_COLLECTION,
                "subject": did,
                "list": list_uri,
                "createdAt": self.clock.now().to_rfc3339(),
            }),
        )
        .await
    }

    async fn remove_member(&self, item_uri: &str) -> Result<(), GroupError> {
        self.post(
            "com.atproto.repo.deleteRecord",
            &json!({
                "repo": self.config.operator_did,
                "collection": LIST_ITEM_COLLECTION,
                "rkey": rkey(item_uri),
            }),
            &[],
        )
        .await?;
        Ok(())
    }

    async fn refresh_starter_pack(
        &self,
        pack: &StarterPack,
        updated_at: Timestamp,
    ) -> Result<(), GroupError> {
        let created_at = if pack.created_at.is_empty() {
            updated_at.to_rfc3339()
        } else {
            pack.created_at.clone()
        };
        self.post(
            "com.atproto.repo.putRecord",
            &json!({
                "repo": self.config.operator_did,
                "collection": STARTER_PACK_COLLECTION,
                "rkey": rkey(&pack.uri),
                "record": {
                    "$type": STARTER_PACK_COLLECTION,
                    "name": pack.name,
                    "description": pack.description,
                    "list": pack.list_uri,
                    "feeds": [],
                    "createdAt": created_at,
                    "updatedAt": updated_at.to_rfc3339(),
                },
            }),
            &[],
        )
        .await?;
        Ok(())
    }

    async fn resolve_identity(&self, handle: &Handle) -> Result<Identity, GroupError> {
        let profile: ProfileView = self
            .get("app.bsky.actor.getProfile", &[("actor", handle.as_str())], &[])
            .await?;
        let resolved = Handle::parse(&profile.handle).unwrap_or_else(|_| handle.clone());
        Ok(Identity::new(resolved, profile.did))
    }

    async fn set_label(&self, did: &str, label: &str) -> Result<(), GroupError> {
        if self.labels_of(did).await?.iter().any(|l| l == label) {
            debug!(%did, %label, "label already present");
            return Ok(());
        }
        self.emit_label_event(did, &[label], &[]).await
    }

    async fn remove_label(&self, did: &str, label: &str) -> Result<(), GroupError> {
        if !self.labels_of(did).await?.iter().any(|l| l == label) {
            debug!(%did, %label, "label not present");
            return Ok(());
        }
        self.emit_label_event(did, &[], &[label]).await
    }

    async fn follow(&self, did: &str) -> Result<(), GroupError> {
        self.create_record(
            FOLLOW_COLLECTION,
            json!({
                "$type": FOLLOW_COLLECTION,
                "subject": did,
                "createdAt": self.clock.now().to_rfc3339(),
            }),
        )
        .await?;
        Ok(())
    }

    async fn send_direct_message(&self, did: &str, text: &str) -> Result<(), GroupError> {
        let proxy = [("atproto-proxy", format!("{}#bsky_chat", self.config.chat_service_did))];
        let convo: ConvoForMembersView = self
            .get("chat.bsky.convo.getConvoForMembers", &[("members", did)], &proxy)
            .await?;
        self.post(
            "chat.bsky.convo.sendMessage",
            &json!({ "convoId": convo.convo.id, "message": { "text": text } }),
            &proxy,
        )
        .await?;
        Ok(())
    }
}
