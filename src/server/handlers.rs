// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::AppState;
use crate::auth::{AdminToken, check_password};
use crate::batch::{BatchRequest, BatchResponse};
use crate::catalog::{ContentPatch, Record, SiteContent};
use crate::error::{AdminError, AdminResult, AuthError, ValidationError};

/// A request carrying a valid admin token.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub AdminToken);

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AdminResult<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = AdminToken::from_authorization(header)?;
        token
            .verify(
                Utc::now(),
                state.auth.token_ttl_secs,
                state.auth.clock_skew_secs,
            )
            .inspect_err(|e| warn!(path = %parts.uri.path(), error = %e, "token rejected"))?;
        Ok(Self(token))
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> AdminResult<T> {
    serde_json::from_slice(body).map_err(|e| ValidationError::InvalidBody(e.to_string()).into())
}

#[derive(Debug, Deserialize)]
pub(super) struct IdQuery {
    id: Option<String>,
}

impl IdQuery {
    fn require<R: Record>(self) -> AdminResult<String> {
        self.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            ValidationError::MissingField {
                resource: R::KIND.name(),
                field: "id",
            }
            .into()
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct HealthBody {
    status: &'static str,
    branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

pub(super) async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    let branch = state.service.branch().to_string();
    match state.service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthBody {
                status: "ok",
                branch,
                detail: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthBody {
                    status: "unhealthy",
                    branch,
                    detail: Some(e.to_string()),
                }),
            )
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginResponse {
    success: bool,
    token: String,
    expires_in: u64,
}

pub(super) async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> AdminResult<Json<LoginResponse>> {
    let request: LoginRequest = if body.is_empty() {
        LoginRequest::default()
    } else {
        parse_body(&body)?
    };
    check_password(
        state.auth.admin_password.as_deref(),
        request.password.as_deref(),
    )
    .inspect_err(|e| warn!(error = %e, "login failed"))?;

    let token = AdminToken::issue(Utc::now());
    info!("admin logged in");
    Ok(Json(LoginResponse {
        success: true,
        token: token.to_string(),
        expires_in: state.auth.token_ttl_secs,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct VerifyRequest {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VerifyResponse {
    success: bool,
    valid: bool,
    expires_at: DateTime<Utc>,
}

pub(super) async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AdminResult<Json<VerifyResponse>> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = if header.is_some() {
        AdminToken::from_authorization(header)?
    } else {
        let request: VerifyRequest = if body.is_empty() {
            VerifyRequest::default()
        } else {
            parse_body(&body)?
        };
        let text = request
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MissingToken)?;
        AdminToken::parse(&text)?
    };
    token.verify(
        Utc::now(),
        state.auth.token_ttl_secs,
        state.auth.clock_skew_secs,
    )?;
    Ok(Json(VerifyResponse {
        success: true,
        valid: true,
        expires_at: token.expires_at(state.auth.token_ttl_secs),
    }))
}

pub(super) async fn batch(
    State(state): State<AppState>,
    _auth: AdminAuth,
    body: Bytes,
) -> AdminResult<Json<BatchResponse>> {
    let request: BatchRequest = parse_body(&body)?;
    let response = state.service.apply_batch(&request).await?;
    info!(
        resources = ?request.resources(),
        commit = response.commit_sha.as_deref().unwrap_or("-"),
        "batch applied"
    );
    Ok(Json(response))
}

pub(super) async fn list<R: Record>(State(state): State<AppState>) -> AdminResult<Json<Vec<R>>> {
    Ok(Json(state.service.list::<R>().await?))
}

pub(super) async fn create<R: Record>(
    State(state): State<AppState>,
    _auth: AdminAuth,
    body: Bytes,
) -> AdminResult<(StatusCode, Json<R>)> {
    let draft: R::Draft = parse_body(&body)?;
    let record = state.service.create::<R>(draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(super) async fn update<R: Record>(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<IdQuery>,
    body: Bytes,
) -> AdminResult<Json<R>> {
    let id = query.require::<R>()?;
    // the id in the query wins over any id in the body
    let mut fields: serde_json::Map<String, Value> = parse_body(&body)?;
    fields.insert("id".to_string(), Value::String(id.clone()));
    let patch: R::Patch = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ValidationError::InvalidBody(e.to_string()))?;
    Ok(Json(state.service.update::<R>(&id, &patch).await?))
}

#[derive(Debug, Serialize)]
pub(super) struct Deleted {
    success: bool,
}

pub(super) async fn delete<R: Record>(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<IdQuery>,
) -> AdminResult<Json<Deleted>> {
    let id = query.require::<R>()?;
    state.service.delete::<R>(&id).await?;
    Ok(Json(Deleted { success: true }))
}

pub(super) async fn content(State(state): State<AppState>) -> AdminResult<Json<SiteContent>> {
    Ok(Json(state.service.content().await?))
}

pub(super) async fn update_content(
    State(state): State<AppState>,
    _auth: AdminAuth,
    body: Bytes,
) -> AdminResult<Json<SiteContent>> {
    let patch: ContentPatch = parse_body(&body)?;
    Ok(Json(state.service.update_content(patch).await?))
}
