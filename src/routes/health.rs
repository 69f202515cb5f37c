use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store_ok: bool,
    pub store_error: Option<String>,
    pub active_sessions: usize,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Health check", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    // Lightweight reachability probe; an unreachable store is reported in the
    // body, never as a non-200.
    let probe = state.store.probe().await;
    let active_sessions = state.sessions.len();

    let response = match probe {
        Ok(_) => HealthResponse {
            status: "ok",
            store_ok: true,
            store_error: None,
            active_sessions,
        },
        Err(e) => HealthResponse {
            status: "ok",
            store_ok: false,
            store_error: Some(e.to_string()),
            active_sessions,
        },
    };

    Ok(Json(response))
}
