//! Mock service agent endpoints
//!
//! Each endpoint accepts any body, waits for the agent's latency profile
//! (unless disabled), and answers with the agent's JSON document.

use axum::{extract::State, Json};
use pairagent_agents::AgentKind;
use serde_json::Value;
use std::sync::Arc;

use crate::extract::LenientJson;
use crate::state::AppState;

pub async fn pricing(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<Value>,
) -> Json<Value> {
    serve(&state, AgentKind::Pricing, body).await
}

pub async fn routing(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<Value>,
) -> Json<Value> {
    serve(&state, AgentKind::Routing, body).await
}

pub async fn slot(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<Value>,
) -> Json<Value> {
    serve(&state, AgentKind::Slot, body).await
}

pub async fn weather(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<Value>,
) -> Json<Value> {
    serve(&state, AgentKind::Weather, body).await
}

async fn serve(state: &AppState, kind: AgentKind, body: Value) -> Json<Value> {
    if state.simulate_latency {
        kind.latency().wait().await;
    }
    tracing::debug!(agent = %kind, "Agent call");
    Json(kind.respond(&body, &state.context))
}
