//! Agent catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use pairagent_registry::RegistryListing;
use pairagent_types::AgentConfig;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<RegistryListing> {
    Json(RegistryListing::new(&state.registry, state.device().clone()))
}

pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AgentConfig>> {
    let agent = state.registry.require(&id)?;
    Ok(Json(agent.clone()))
}
