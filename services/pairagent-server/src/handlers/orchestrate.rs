use axum::{extract::State, Json};
use pairagent_orchestrator::OrchestrateResponse;
use pairagent_types::DeviceState;
use std::sync::Arc;

use crate::extract::LenientJson;
use crate::state::AppState;

/// Plan the next sequence for a device state. Never fails.
pub async fn orchestrate(
    State(state): State<Arc<AppState>>,
    LenientJson(device): LenientJson<DeviceState>,
) -> Json<OrchestrateResponse> {
    let resolved = state.resolver.resolve(&device).await;
    tracing::info!(
        scenario = %device.scenario(),
        battery = device.battery_level,
        method = %resolved.planning_method,
        steps = resolved.plan.step_count(),
        "Plan produced"
    );
    Json(OrchestrateResponse::new(resolved, state.device()))
}
