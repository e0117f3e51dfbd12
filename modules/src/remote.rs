//! Verifier backed by a separate validation service.
//!
//! The validation service exposes one endpoint per module and answers
//! `POST /validate-{module}/?verify_only=true` with `200` and the list of
//! titles the identity qualifies for, or a non-success status carrying the
//! rejection reason as plain text.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use badge_naming::{Module, Naming, NamingResolver};
use badge_types::Handle;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModuleError;
use crate::verifier::{CredentialVerifier, Verdict};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationRequest<'a> {
    verification_id: &'a str,
    bsky_handle: &'a str,
}

#[derive(Debug, Deserialize)]
struct TitleEntry {
    title: String,
}

pub struct RemoteVerifier {
    module: Module,
    url: String,
    http_client: reqwest::Client,
}

impl RemoteVerifier {
    pub fn new(module: Module, base_url: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        let url = format!(
            "{}/validate-{}/?verify_only=true",
            base_url.trim_end_matches('/'),
            module.key
        );
        Self {
            module,
            url,
            http_client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(
        &self,
        verification_id: &str,
        handle: &Handle,
    ) -> Result<Result<Vec<String>, String>, ModuleError> {
        debug!(module = %self.module.key, %handle, "checking credential with validation service");
        let response = self
            .http_client
            .post(&self.url)
            .json(&ValidationRequest {
                verification_id,
                bsky_handle: handle.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ModuleError::RequestFailed(format!("HTTP status {status}")));
        }
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Ok(Err(reason.trim().to_string()));
        }
        let entries: Vec<TitleEntry> = response
            .json()
            .await
            .map_err(|e| ModuleError::InvalidResponse(format!("failed to parse titles: {e}")))?;
        Ok(Ok(entries.into_iter().map(|e| e.title).collect()))
    }
}

#[async_trait]
impl CredentialVerifier for RemoteVerifier {
    fn module(&self) -> &Module {
        &self.module
    }

    async fn verify(&self, verification_id: &str, handle: &Handle) -> Result<Verdict, ModuleError> {
        Ok(match self.call(verification_id, handle).await? {
            Ok(_) => Verdict::Verified,
            Err(reason) if reason.is_empty() => Verdict::Rejected("verification failed".into()),
            Err(reason) => Verdict::Rejected(reason),
        })
    }

    /// Narrows the module to the categories whose titles the validation
    /// service reported for this identity.
    async fn naming(
        &self,
        resolver: &NamingResolver,
        verification_id: &str,
        handle: &Handle,
    ) -> Result<Naming, ModuleError> {
        let full = resolver.resolve(&self.module)?;
        if self.module.hierarchy.is_empty() {
            return Ok(full);
        }
        let titles = match self.call(verification_id, handle).await? {
            Ok(titles) => titles.into_iter().collect::<HashSet<_>>(),
            Err(reason) => return Err(ModuleError::RequestFailed(reason)),
        };
        let narrowed = self
            .module
            .narrowed(&selected_by_titles(&self.module, &full, &titles));
        Ok(resolver.resolve(&narrowed)?)
    }
}

/// Names of the categories of `module` whose resolved titles appear in
/// `titles`. `full` must be the resolution of `module`'s complete hierarchy.
fn selected_by_titles(
    module: &Module,
    full: &Naming,
    titles: &HashSet<String>,
) -> Vec<(String, Vec<String>)> {
    module
        .hierarchy
        .iter()
        .zip(full.first_levels.iter())
        .filter(|(_, first)| titles.contains(&first.node.title))
        .map(|(category, first)| {
            let subs = category
                .subcategories
                .iter()
                .zip(first.children.iter())
                .filter(|(_, child)| titles.contains(&child.title))
                .map(|(sub, _)| sub.clone())
                .collect();
            (category.name.clone(), subs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use badge_naming::Category;
    use badge_types::PolicyParams;

    #[test]
    fn url_per_module() {
        let v = RemoteVerifier::new(builtin::mvp(), "http://validator:3000/", Duration::from_secs(1));
        assert_eq!(v.url(), "http://validator:3000/validate-mvp/?verify_only=true");
    }

    #[test]
    fn request_body_is_camel_case() {
        let body = serde_json::to_value(ValidationRequest {
            verification_id: "abc",
            bsky_handle: "alice.bsky.social",
        })
        .unwrap();
        assert_eq!(body["verificationId"], "abc");
        assert_eq!(body["bskyHandle"], "alice.bsky.social");
    }

    #[test]
    fn narrowing_keeps_reported_categories_only() {
        let resolver = NamingResolver::new(&PolicyParams::default());
        let module = builtin::mvp();
        let full = resolver.resolve(&module).unwrap();
        let titles: HashSet<String> = [
            "Verified MVPs",
            "Verified MVPs: AI Platform",
            "Verified MVPs: AI Platform - Azure AI Services",
            "Ver. MVPs: CDM - Hyper-V",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let narrowed = module.narrowed(&selected_by_titles(&module, &full, &titles));
        assert_eq!(
            narrowed.hierarchy,
            vec![Category::new("AI Platform", ["Azure AI Services"])]
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let v = RemoteVerifier::new(builtin::rd(), "http://127.0.0.1:9", Duration::from_millis(500));
        let handle = Handle::parse("alice.bsky.social").unwrap();
        assert!(v.verify("id", &handle).await.is_err());
    }
}
