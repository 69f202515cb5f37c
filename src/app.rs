use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authz::{self, PolicyStore, SessionRegistry};
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{access, health};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PolicyStore>,
    pub sessions: Arc<SessionRegistry>,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn PolicyStore>, sessions: SessionRegistry, jwt: JwtConfig) -> Self {
        Self {
            store,
            sessions: Arc::new(sessions),
            jwt: Arc::new(jwt),
        }
    }
}

pub async fn create_app(store: Arc<dyn PolicyStore>) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let fallback_role = authz::fallback_role_from_env();
    let sessions = SessionRegistry::new(Arc::clone(&store), fallback_role);
    let state = AppState::new(store, sessions, jwt_config);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let access_routes = Router::new()
        .route("/check", post(access::check_permission))
        .route("/can-manage", post(access::can_manage_role))
        .route("/grants", get(access::list_grants))
        .route("/session", delete(access::end_session));

    let router = Router::new()
        .nest("/access", access_routes)
        .route("/api/health", get(health::health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
