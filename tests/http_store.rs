use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use tablero_authz::{
    AccessResolver, Action, HttpPolicyStore, PolicyStore, Resource, Role, StoreError,
};

#[derive(Debug, Clone)]
struct RecordedCall {
    function: String,
    apikey: Option<String>,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct StubState {
    reply: Value,
    status: StatusCode,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

async fn rpc_stub(
    State(state): State<StubState>,
    Path(function): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    state.calls.lock().unwrap().push(RecordedCall {
        function,
        apikey: header("apikey"),
        authorization: header("authorization"),
        body,
    });

    (state.status, Json(state.reply.clone()))
}

/// Serve a recording policy endpoint on an ephemeral port.
async fn spawn_stub(
    reply: Value,
    status: StatusCode,
) -> Result<(String, Arc<Mutex<Vec<RecordedCall>>>)> {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        reply,
        status,
        calls: Arc::clone(&calls),
    };
    let router = Router::new()
        .route("/rpc/:function", post(rpc_stub))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router.into_make_service()).await;
    });

    Ok((format!("http://{}", addr), calls))
}

#[tokio::test]
async fn rpc_requests_carry_the_key_and_arguments() -> Result<()> {
    let (base_url, calls) = spawn_stub(json!({"granted": true}), StatusCode::OK).await?;
    let store = HttpPolicyStore::new(
        &base_url,
        Some("sekret-key".to_string()),
        Duration::from_secs(2),
    )?;

    let payload = store
        .evaluate_permission(Role::Manager, Resource::Vehicles, Action::Edit)
        .await?;
    assert_eq!(payload, json!({"granted": true}));

    store
        .evaluate_role_management(Role::Admin, Role::Operario)
        .await?;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);

    let permission = &calls[0];
    assert_eq!(permission.function, "evaluate_permission");
    assert_eq!(
        permission.body,
        json!({"role": "manager", "resource": "vehicles", "action": "edit"})
    );
    assert_eq!(permission.apikey.as_deref(), Some("sekret-key"));
    assert_eq!(
        permission.authorization.as_deref(),
        Some("Bearer sekret-key")
    );

    let management = &calls[1];
    assert_eq!(management.function, "evaluate_role_management");
    assert_eq!(
        management.body,
        json!({"manager_role": "admin", "target_role": "operario"})
    );

    Ok(())
}

#[tokio::test]
async fn non_success_statuses_surface_as_rejections() -> Result<()> {
    let (base_url, _calls) =
        spawn_stub(json!({"error": "boom"}), StatusCode::INTERNAL_SERVER_ERROR).await?;
    let store = HttpPolicyStore::new(&base_url, None, Duration::from_secs(2))?;

    let err = store
        .evaluate_permission(Role::Admin, Resource::Dashboard, Action::View)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(500)), "got {err:?}");

    Ok(())
}

#[tokio::test]
async fn trailing_slash_in_the_base_url_is_tolerated() -> Result<()> {
    let (base_url, calls) = spawn_stub(json!(true), StatusCode::OK).await?;
    let store = HttpPolicyStore::new(format!("{}/", base_url), None, Duration::from_secs(2))?;

    let payload = store
        .evaluate_permission(Role::Operario, Resource::Kiosk, Action::View)
        .await?;
    assert_eq!(payload, json!(true));

    // the unkeyed client sends no credential headers
    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].apikey, None);
    assert_eq!(calls[0].authorization, None);

    Ok(())
}

#[tokio::test]
async fn resolver_prefers_the_live_verdict_over_the_hierarchy() -> Result<()> {
    // The hierarchy would grant an admin anything; the endpoint says no.
    let (base_url, calls) = spawn_stub(json!(false), StatusCode::OK).await?;
    let store = HttpPolicyStore::new(&base_url, None, Duration::from_secs(2))?;
    let resolver = AccessResolver::new(Arc::new(store), Role::Unknown);

    assert!(
        !resolver
            .check_permission(Some("admin"), Resource::Dashboard, Action::View)
            .await
    );

    // Cached; the endpoint saw exactly one round trip.
    assert!(
        !resolver
            .check_permission(Some("admin"), Resource::Dashboard, Action::View)
            .await
    );
    assert_eq!(calls.lock().unwrap().len(), 1);

    Ok(())
}
