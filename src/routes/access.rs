//! Access decision endpoints.
//!
//! These are the dashboard's authorization surface. Decisions never fail
//! with an error status: degraded backends, unknown roles and anonymous
//! callers all still produce a boolean verdict. The only hard rejections
//! here are malformed payloads (axum's typed `Json` handles those) and
//! tearing down a session without a token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app::AppState;
use crate::authz::{grant_map, Action, Resource, Role};
use crate::errors::{AppError, AppResult};
use crate::jwt::CurrentActor;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckRequest {
    pub resource: Resource,
    pub action: Action,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DecisionResponse {
    pub allowed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CanManageRequest {
    /// Raw role string of the account being managed. Unrecognized values
    /// degrade to the unknown role instead of failing validation.
    pub target_role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GrantsResponse {
    pub role: Role,
    pub grants: Vec<GrantEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GrantEntry {
    pub resource: Resource,
    pub actions: Vec<Action>,
}

/// Decide one permission for the current actor
#[utoipa::path(
    post,
    path = "/access/check",
    tag = "Access",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Verdict for the requested permission", body = DecisionResponse),
        (status = 422, description = "Unknown resource or action"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_permission(
    State(state): State<AppState>,
    CurrentActor(claims): CurrentActor,
    Json(req): Json<CheckRequest>,
) -> AppResult<Json<DecisionResponse>> {
    let resolver = state
        .sessions
        .resolver_for(claims.as_ref().map(|c| c.user_id));
    let allowed = resolver
        .check_permission(
            claims.as_ref().map(|c| c.role.as_str()),
            req.resource,
            req.action,
        )
        .await;

    Ok(Json(DecisionResponse { allowed }))
}

/// Decide whether the current actor may manage accounts with the target role
#[utoipa::path(
    post,
    path = "/access/can-manage",
    tag = "Access",
    request_body = CanManageRequest,
    responses(
        (status = 200, description = "Verdict for the management request", body = DecisionResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn can_manage_role(
    State(state): State<AppState>,
    CurrentActor(claims): CurrentActor,
    Json(req): Json<CanManageRequest>,
) -> AppResult<Json<DecisionResponse>> {
    let resolver = state
        .sessions
        .resolver_for(claims.as_ref().map(|c| c.user_id));
    let allowed = resolver
        .can_manage_role(claims.as_ref().map(|c| c.role.as_str()), &req.target_role)
        .await;

    Ok(Json(DecisionResponse { allowed }))
}

/// List the static grants for the current actor's role
#[utoipa::path(
    get,
    path = "/access/grants",
    tag = "Access",
    responses(
        (status = 200, description = "Static grant listing", body = GrantsResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_grants(
    State(state): State<AppState>,
    CurrentActor(claims): CurrentActor,
) -> AppResult<Json<GrantsResponse>> {
    let role = match &claims {
        Some(claims) => Role::normalize(Some(&claims.role)),
        None => state.sessions.fallback_role(),
    };

    let grants = grant_map(role)
        .into_iter()
        .map(|(resource, actions)| GrantEntry { resource, actions })
        .collect();

    Ok(Json(GrantsResponse { role, grants }))
}

/// Tear down the current actor's authorization boundary
#[utoipa::path(
    delete,
    path = "/access/session",
    tag = "Access",
    responses(
        (status = 204, description = "Session ended and cache flushed"),
        (status = 401, description = "No valid bearer token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn end_session(
    State(state): State<AppState>,
    CurrentActor(claims): CurrentActor,
) -> AppResult<StatusCode> {
    let claims =
        claims.ok_or_else(|| AppError::unauthorized("session teardown requires a valid bearer token"))?;
    state.sessions.end_session(Some(claims.user_id));

    Ok(StatusCode::NO_CONTENT)
}
