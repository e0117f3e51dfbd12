//! Operator session management.
//!
//! The access token and the account's service endpoint are cached under the
//! reserved keys of the `default` namespace so restarts and parallel
//! processes reuse one session. A cached session is checked with
//! `getSession` before reuse; a missing or rejected one triggers a fresh
//! `createSession` login.

use badge_store::{Session, SessionStore};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::GroupError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: String,
    #[serde(default)]
    did_doc: Option<DidDoc>,
}

#[derive(Debug, Deserialize)]
struct DidDoc {
    #[serde(default)]
    service: Vec<DidService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DidService {
    service_endpoint: String,
}

pub struct SessionManager {
    http: reqwest::Client,
    service_url: String,
    identifier: String,
    password: String,
    store: SessionStore,
    current: Mutex<Option<Session>>,
}

impl SessionManager {
    pub fn new(
        http: reqwest::Client,
        service_url: impl Into<String>,
        identifier: impl Into<String>,
        password: impl Into<String>,
        store: SessionStore,
    ) -> Self {
        Self {
            http,
            service_url: service_url.into().trim_end_matches('/').to_string(),
            identifier: identifier.into(),
            password: password.into(),
            store,
            current: Mutex::new(None),
        }
    }

    /// A usable session: in memory, else cached and still valid, else new.
    pub async fn current(&self) -> Result<Session, GroupError> {
        let mut current = self.current.lock().await;
        if let Some(session) = current.as_ref() {
            return Ok(session.clone());
        }

        if let Some(cached) = self.store.load()? {
            if self.is_valid(&cached).await {
                debug!("reusing cached session");
                *current = Some(cached.clone());
                return Ok(cached);
            }
        }

        info!("no valid cached session, logging in");
        let session = self.login().await?;
        if let Err(e) = self.store.save(&session) {
            warn!(error = %e, "failed to cache session");
        }
        *current = Some(session.clone());
        Ok(session)
    }

    /// Forget the session after the provider rejected it.
    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear cached session");
        }
    }

    async fn is_valid(&self, session: &Session) -> bool {
        let url = format!("{}/xrpc/com.atproto.server.getSession", self.service_url);
        match self.http.get(&url).bearer_auth(&session.access_jwt).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "session check failed");
                false
            }
        }
    }

    async fn login(&self) -> Result<Session, GroupError> {
        if self.password.is_empty() {
            return Err(GroupError::Unauthorized("operator password not configured".into()));
        }
        let url = format!("{}/xrpc/com.atproto.server.createSession", self.service_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "identifier": self.identifier, "password": self.password }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::BAD_REQUEST {
            return Err(GroupError::Unauthorized(format!("login rejected: HTTP status {status}")));
        }
        if !status.is_success() {
            return Err(GroupError::RequestFailed(format!("login: HTTP status {status}")));
        }

        let body: CreateSessionResponse = response
            .json()
            .await
            .map_err(|e| GroupError::InvalidResponse(format!("createSession: {e}")))?;
        let endpoint = body
            .did_doc
            .and_then(|doc| doc.service.into_iter().next())
            .map(|s| s.service_endpoint)
            .unwrap_or_else(|| self.service_url.clone());

        info!(%endpoint, "logged in");
        Ok(Session {
            access_jwt: body.access_jwt,
            endpoint,
        })
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("service_url", &self.service_url)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}
