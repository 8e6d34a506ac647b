//! Device identity

use serde::{Deserialize, Serialize};

pub const DEFAULT_DEVICE_ID: &str = "PP-EV-X402-DEMO";
pub const DEFAULT_ERC8004_ID: &str = "8004";

/// Static identity of the device that hires agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    #[serde(rename = "type")]
    pub device_type: String,
    pub model: String,
    /// PairPoint device identifier
    pub device_id: String,
    /// ERC-8004 agent identity
    pub erc8004_id: String,
    pub network: String,
    pub encryption: String,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            device_type: "EV".to_string(),
            model: "PairAgent EV-X402".to_string(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
            erc8004_id: DEFAULT_ERC8004_ID.to_string(),
            network: "SKALE Base Sepolia".to_string(),
            encryption: "BITE Protocol".to_string(),
        }
    }
}

impl DeviceProfile {
    /// Override identifiers. Empty values keep the defaults.
    pub fn with_ids(mut self, device_id: Option<String>, erc8004_id: Option<String>) -> Self {
        if let Some(id) = device_id.filter(|s| !s.trim().is_empty()) {
            self.device_id = id;
        }
        if let Some(id) = erc8004_id.filter(|s| !s.trim().is_empty()) {
            self.erc8004_id = id;
        }
        self
    }
}
