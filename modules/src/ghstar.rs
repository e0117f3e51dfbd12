//! GitHub Stars verifier.
//!
//! Looks the star up on the public GraphQL API and accepts when the profile
//! links back to the Bluesky profile of the handle being verified.

use std::time::Duration;

use async_trait::async_trait;
use badge_naming::Module;
use badge_types::Handle;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ModuleError;
use crate::verifier::{CredentialVerifier, Verdict};

pub const DEFAULT_ENDPOINT: &str = "https://api-stars.github.com/";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const QUERY: &str = r#"
query GetStars($username: String!) {
  publicProfile(username: $username) {
    username
    links {
      id
      link
      platform
      __typename
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct StarsResponse {
    #[serde(default)]
    data: Option<StarsData>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StarsData {
    #[serde(rename = "publicProfile")]
    public_profile: Option<PublicProfile>,
}

#[derive(Debug, Deserialize)]
struct PublicProfile {
    #[serde(default)]
    links: Vec<ProfileLink>,
}

#[derive(Debug, Deserialize)]
struct ProfileLink {
    link: String,
}

pub struct GitHubStarsVerifier {
    module: Module,
    endpoint: String,
    http_client: reqwest::Client,
}

impl GitHubStarsVerifier {
    pub fn new(module: Module, timeout: Duration) -> Self {
        Self::with_endpoint(module, DEFAULT_ENDPOINT, timeout)
    }

    pub fn with_endpoint(module: Module, endpoint: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            module,
            endpoint: endpoint.to_string(),
            http_client,
        }
    }
}

/// Decide from a decoded API response.
fn verdict(response: StarsResponse, handle: &Handle) -> Verdict {
    if !response.errors.is_empty() {
        return Verdict::Rejected(format!("GraphQL error: {:?}", response.errors));
    }
    let Some(profile) = response.data.and_then(|d| d.public_profile) else {
        return Verdict::Rejected("GitHub Star profile not found".into());
    };
    let expected = format!("https://bsky.app/profile/{handle}");
    if profile.links.iter().any(|l| l.link == expected) {
        Verdict::Verified
    } else {
        Verdict::Rejected("bsky handle not found in GitHub Star profile".into())
    }
}

#[async_trait]
impl CredentialVerifier for GitHubStarsVerifier {
    fn module(&self) -> &Module {
        &self.module
    }

    async fn verify(&self, verification_id: &str, handle: &Handle) -> Result<Verdict, ModuleError> {
        debug!(username = verification_id, %handle, "querying GitHub Stars");
        let body = json!({
            "operationName": "GetStars",
            "variables": { "username": verification_id },
            "query": QUERY,
        });
        let response = self.http_client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ModuleError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        let decoded: StarsResponse = response
            .json()
            .await
            .map_err(|e| ModuleError::InvalidResponse(format!("failed to decode response: {e}")))?;
        Ok(verdict(decoded, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> Handle {
        Handle::parse("alice.bsky.social").unwrap()
    }

    fn parse(raw: &str) -> StarsResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn accepts_profile_linking_back() {
        let response = parse(
            r#"{"data":{"publicProfile":{"username":"alice","links":[
                {"id":"1","link":"https://github.com/alice","platform":"GITHUB"},
                {"id":"2","link":"https://bsky.app/profile/alice.bsky.social","platform":"OTHER"}
            ]}}}"#,
        );
        assert_eq!(verdict(response, &handle()), Verdict::Verified);
    }

    #[test]
    fn rejects_missing_link() {
        let response = parse(
            r#"{"data":{"publicProfile":{"username":"alice","links":[
                {"id":"1","link":"https://bsky.app/profile/mallory.bsky.social","platform":"OTHER"}
            ]}}}"#,
        );
        assert!(!verdict(response, &handle()).is_verified());
    }

    #[test]
    fn rejects_unknown_profile() {
        let response = parse(r#"{"data":{"publicProfile":null}}"#);
        assert_eq!(
            verdict(response, &handle()),
            Verdict::Rejected("GitHub Star profile not found".into())
        );
    }

    #[test]
    fn graphql_errors_reject() {
        let response = parse(r#"{"data":null,"errors":[{"message":"boom"}]}"#);
        match verdict(response, &handle()) {
            Verdict::Rejected(reason) => assert!(reason.starts_with("GraphQL error")),
            Verdict::Verified => panic!("expected rejection"),
        }
    }
}
