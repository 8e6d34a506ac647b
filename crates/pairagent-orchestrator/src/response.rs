//! Orchestrate endpoint wire format

use pairagent_registry::DeviceProfile;
use pairagent_types::{OrchestratorPlan, PlanningMethod};
use serde::{Deserialize, Serialize};

use crate::ResolvedPlan;

pub const ORCHESTRATOR_NAME: &str = "PairAgent EV Brain";
pub const PAYMENT_ENCRYPTION: &str = "SKALE BITE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrateMetadata {
    pub planning_method: PlanningMethod,
    pub erc8004_agent_id: String,
    pub encryption: String,
}

/// Body returned by `POST /api/orchestrate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrateResponse {
    pub orchestrator: String,
    pub device_id: String,
    pub plan: OrchestratorPlan,
    pub metadata: OrchestrateMetadata,
}

impl OrchestrateResponse {
    pub fn new(resolved: ResolvedPlan, device: &DeviceProfile) -> Self {
        Self {
            orchestrator: ORCHESTRATOR_NAME.to_string(),
            device_id: device.device_id.clone(),
            plan: resolved.plan,
            metadata: OrchestrateMetadata {
                planning_method: resolved.planning_method,
                erc8004_agent_id: device.erc8004_id.clone(),
                encryption: PAYMENT_ENCRYPTION.to_string(),
            },
        }
    }
}
