//! Health Check Handler

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    pub agents: usize,
    pub llm_planning: bool,
    pub payment_required: bool,
}

/// Returns 200 while the process is up
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "pairagent-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        agents: state.registry.len(),
        llm_planning: state.resolver.has_primary(),
        payment_required: state.payments.require_payment,
    })
}
