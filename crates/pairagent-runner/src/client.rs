//! Plan sources and the PairAgent HTTP client
//!
//! The runner does not care where a plan comes from. [`PairAgentClient`]
//! asks a running server over HTTP; a [`PlanResolver`] plans in-process.

use async_trait::async_trait;
use pairagent_orchestrator::{OrchestrateResponse, PlanResolver, ResolvedPlan};
use pairagent_registry::RegistryListing;
use pairagent_types::DeviceState;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to reach {url}: {message}")]
    Network { url: String, message: String },

    #[error("Server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {message}")]
    InvalidResponse { message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Somewhere a plan can be obtained from
#[async_trait]
pub trait PlanSource: Send + Sync {
    async fn fetch_plan(&self, state: &DeviceState) -> Result<ResolvedPlan>;
}

#[async_trait]
impl PlanSource for PlanResolver {
    async fn fetch_plan(&self, state: &DeviceState) -> Result<ResolvedPlan> {
        Ok(self.resolve(state).await)
    }
}

/// HTTP client for a running pairagent-server
#[derive(Debug, Clone)]
pub struct PairAgentClient {
    base_url: String,
    client: reqwest::Client,
}

impl PairAgentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether `/health` answers within two seconds
    pub async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get("/health").await
    }

    pub async fn registry(&self) -> Result<RegistryListing> {
        self.get("/api/registry").await
    }

    pub async fn orchestrate(&self, state: &DeviceState) -> Result<OrchestrateResponse> {
        let url = format!("{}/api/orchestrate", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(state)
            .send()
            .await
            .map_err(|e| network(&url, e))?;
        decode(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| network(&url, e))?;
        decode(resp).await
    }
}

#[async_trait]
impl PlanSource for PairAgentClient {
    async fn fetch_plan(&self, state: &DeviceState) -> Result<ResolvedPlan> {
        let response = self.orchestrate(state).await?;
        Ok(ResolvedPlan {
            plan: response.plan,
            planning_method: response.metadata.planning_method,
        })
    }
}

fn network(url: &str, e: reqwest::Error) -> ClientError {
    ClientError::Network {
        url: url.to_string(),
        message: e.to_string(),
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body: serde_json::Value = resp.json().await.unwrap_or_default();
        let message = body
            .get("msg")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    resp.json().await.map_err(|e| ClientError::InvalidResponse {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use pairagent_registry::{AgentRegistry, DeviceProfile};
    use pairagent_types::PlanningMethod;
    use std::sync::Arc;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_plan_over_http() {
        let router = Router::new().route(
            "/api/orchestrate",
            post(|Json(state): Json<DeviceState>| async move {
                let resolver = PlanResolver::rules(Arc::new(AgentRegistry::default_fleet()));
                let resolved = resolver.resolve(&state).await;
                Json(OrchestrateResponse::new(resolved, &DeviceProfile::default()))
            }),
        );
        let client = PairAgentClient::new(&spawn(router).await);

        let resolved = client.fetch_plan(&DeviceState::new(12.0, 1.0)).await.unwrap();
        assert_eq!(resolved.planning_method, PlanningMethod::RuleBased);
        assert_eq!(resolved.plan.step_count(), 4);
        assert!(resolved.plan.trigger.contains("12%"));
    }

    #[tokio::test]
    async fn test_status_error_carries_message() {
        let router = Router::new().route(
            "/api/orchestrate",
            post(|| async {
                (
                    axum::http::StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({"code": 503, "msg": "planner offline"})),
                )
            }),
        );
        let client = PairAgentClient::new(&spawn(router).await);

        match client.fetch_plan(&DeviceState::default()).await {
            Err(ClientError::Status { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "planner offline");
            }
            other => panic!("expected status error, got {:?}", other.map(|r| r.plan)),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = PairAgentClient::new("http://127.0.0.1:1");
        assert!(!client.is_available().await);
        assert!(matches!(
            client.fetch_plan(&DeviceState::default()).await,
            Err(ClientError::Network { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolver_is_a_plan_source() {
        let resolver = PlanResolver::rules(Arc::new(AgentRegistry::default_fleet()));
        let source: &dyn PlanSource = &resolver;
        let resolved = source.fetch_plan(&DeviceState::default()).await.unwrap();
        assert_eq!(resolved.plan.first_agent(), Some("weather-agent"));
    }
}
