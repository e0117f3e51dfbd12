//! RPC request handlers.

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use badge_groups::{GroupLink, TitleGroups};
use badge_lifecycle::{Engine, LifecycleError, ValidationResult};
use badge_types::{Handle, ModuleKey};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::info;

use crate::error::RpcError;
use crate::metrics::RpcMetrics;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub metrics: Arc<RpcMetrics>,
    /// Bearer token for the unverify and reconciliation endpoints. When
    /// unset those endpoints refuse every request.
    pub api_token: Option<String>,
}

/// JSON body whose rejection renders like every other [`RpcError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(RpcError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejection renders like every other [`RpcError`].
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(RpcError))]
pub struct ApiQuery<T>(pub T);

// ── Validation ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub verification_id: String,
    pub bsky_handle: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateQuery {
    #[serde(default)]
    pub verify_only: bool,
}

#[derive(Debug, Serialize)]
pub struct UnverifyResponse {
    pub removed: usize,
}

// ── Weekly validation ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub bsky_handle: String,
    pub module_key: String,
    pub failure_count: u32,
}

fn module_key(raw: &str) -> Result<ModuleKey, RpcError> {
    Ok(ModuleKey::parse(raw)?)
}

fn handle(raw: &str) -> Result<Handle, RpcError> {
    Ok(Handle::parse(raw)?)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), RpcError> {
    let Some(expected) = state.api_token.as_deref().filter(|t| !t.is_empty()) else {
        return Err(RpcError::Unauthorized);
    };
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) => Ok(()),
        _ => Err(RpcError::Unauthorized),
    }
}

pub async fn validate(
    State(state): State<AppState>,
    Path(module): Path<String>,
    ApiQuery(query): ApiQuery<ValidateQuery>,
    ApiJson(request): ApiJson<ValidateRequest>,
) -> Result<Json<Vec<GroupLink>>, RpcError> {
    let module = module_key(&module)?;
    let handle = handle(&request.bsky_handle)?;
    let enrollment = &state.engine.enrollment;

    let result = if query.verify_only {
        enrollment
            .preview(&module, &request.verification_id, &handle)
            .await
    } else {
        enrollment
            .enroll(&module, &request.verification_id, &handle)
            .await
    };

    match result {
        Ok(links) => {
            if !query.verify_only {
                state.metrics.enrollments.inc();
            }
            Ok(Json(links))
        }
        Err(e) => {
            if e.is_client_error() {
                state.metrics.enrollments_rejected.inc();
            }
            Err(e.into())
        }
    }
}

pub async fn unverify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(module): Path<String>,
    ApiJson(request): ApiJson<ValidateRequest>,
) -> Result<Json<UnverifyResponse>, RpcError> {
    authorize(&state, &headers)?;
    let module = module_key(&module)?;
    let handle = handle(&request.bsky_handle)?;

    let removed = state
        .engine
        .enrollment
        .unenroll(&module, &request.verification_id, &handle)
        .await?;
    state.metrics.unenrollments.inc();
    Ok(Json(UnverifyResponse { removed }))
}

pub async fn naming(
    State(state): State<AppState>,
    Path(module): Path<String>,
) -> Result<impl IntoResponse, RpcError> {
    let module = module_key(&module)?;
    Ok(Json(state.engine.enrollment.flat_naming(&module)?))
}

pub async fn verification_text(
    State(state): State<AppState>,
    Path(module): Path<String>,
) -> Result<String, RpcError> {
    let module = module_key(&module)?;
    Ok(state.engine.enrollment.explanation(&module)?)
}

pub async fn groups_for_title(
    State(state): State<AppState>,
    Path((module, title)): Path<(String, String)>,
) -> Result<Json<TitleGroups>, RpcError> {
    let module = module_key(&module)?;
    // The module must exist even though lookup is by title alone.
    state.engine.enrollment.explanation(&module)?;
    let groups = state
        .engine
        .assigner
        .groups_for_title(&title)
        .await
        .map_err(LifecycleError::from)?;
    Ok(Json(groups))
}

pub async fn report_failures(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(report): ApiJson<FailureReport>,
) -> Result<Json<ValidationResult>, RpcError> {
    authorize(&state, &headers)?;
    let module = module_key(&report.module_key)?;
    let handle = handle(&report.bsky_handle)?;

    let result = state
        .engine
        .tracker
        .record_result(&handle, &module, report.failure_count)
        .await?;

    let outcome = if report.failure_count == 0 { "valid" } else { "failed" };
    state
        .metrics
        .probation_reports
        .with_label_values(&[outcome])
        .inc();
    for module_result in result.module_results.values() {
        if module_result.removed {
            state.metrics.removals.inc();
        } else if module_result.message_sent {
            state.metrics.warnings_sent.inc();
        }
    }
    info!(%handle, %module, failure_count = report.failure_count, action = ?result.action, "failure report applied");
    Ok(Json(result))
}

pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_handle): Path<String>,
) -> Result<Json<ValidationResult>, RpcError> {
    authorize(&state, &headers)?;
    let handle = handle(&raw_handle)?;
    Ok(Json(state.engine.driver.status(&handle).await?))
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, RpcError> {
    let body = state.metrics.render()?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
