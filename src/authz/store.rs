use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::AppError;

use super::resource::{Action, Resource};
use super::role::Role;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Ways a policy store call can fail. All of them are recovered by the
/// resolver's static fallback; none abort a request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The round trip itself failed: connect, timeout, or body read.
    #[error("policy rpc transport failure: {0}")]
    Transport(String),
    /// The endpoint answered with a non-success status.
    #[error("policy rpc rejected with status {0}")]
    Rejected(u16),
    /// No remote endpoint is configured for this process.
    #[error("remote policy evaluation disabled")]
    Disabled,
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Remote policy evaluation behind a narrow contract.
///
/// Implementations return the raw response payload; interpreting it is the
/// resolver's job because the response shape is not contractually fixed.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Ask the authoritative policy whether `role` may perform `action` on
    /// `resource`.
    async fn evaluate_permission(
        &self,
        role: Role,
        resource: Resource,
        action: Action,
    ) -> Result<Value, StoreError>;

    /// Ask the authoritative policy whether `manager` may administer accounts
    /// holding `target`.
    async fn evaluate_role_management(
        &self,
        manager: Role,
        target: Role,
    ) -> Result<Value, StoreError>;

    /// Reachability check for health reporting.
    async fn probe(&self) -> Result<(), StoreError> {
        self.evaluate_permission(Role::Admin, Resource::Dashboard, Action::View)
            .await
            .map(|_| ())
    }
}

/// Policy store speaking the PostgREST-style RPC convention:
/// `POST {base}/rpc/{function}` with JSON arguments, authenticated by an
/// `apikey` header plus the same key as a bearer token.
pub struct HttpPolicyStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPolicyStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::configuration(format!("failed to build policy rpc client: {e}")))?;
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Build from `POLICY_RPC_URL`, `POLICY_RPC_KEY` and
    /// `POLICY_RPC_TIMEOUT_SECS`. Returns `Ok(None)` when no endpoint is
    /// configured, which callers treat as running offline.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        let base_url = match std::env::var("POLICY_RPC_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => return Ok(None),
        };

        let api_key = std::env::var("POLICY_RPC_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let timeout_secs = match std::env::var("POLICY_RPC_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::configuration("POLICY_RPC_TIMEOUT_SECS must be a whole number of seconds")
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(base_url, api_key, Duration::from_secs(timeout_secs)).map(Some)
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, StoreError> {
        let url = format!("{}/rpc/{}", self.base_url, function);
        let mut request = self.client.post(&url).json(&args);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PolicyStore for HttpPolicyStore {
    async fn evaluate_permission(
        &self,
        role: Role,
        resource: Resource,
        action: Action,
    ) -> Result<Value, StoreError> {
        self.rpc(
            "evaluate_permission",
            json!({
                "role": role.as_str(),
                "resource": resource.as_str(),
                "action": action.as_str(),
            }),
        )
        .await
    }

    async fn evaluate_role_management(
        &self,
        manager: Role,
        target: Role,
    ) -> Result<Value, StoreError> {
        self.rpc(
            "evaluate_role_management",
            json!({
                "manager_role": manager.as_str(),
                "target_role": target.as_str(),
            }),
        )
        .await
    }
}

/// Stand-in used when no policy endpoint is configured. Every call reports
/// [`StoreError::Disabled`], so the resolver serves the static hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflinePolicyStore;

#[async_trait]
impl PolicyStore for OfflinePolicyStore {
    async fn evaluate_permission(
        &self,
        _role: Role,
        _resource: Resource,
        _action: Action,
    ) -> Result<Value, StoreError> {
        Err(StoreError::Disabled)
    }

    async fn evaluate_role_management(
        &self,
        _manager: Role,
        _target: Role,
    ) -> Result<Value, StoreError> {
        Err(StoreError::Disabled)
    }
}
