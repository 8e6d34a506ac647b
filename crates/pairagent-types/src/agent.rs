//! Agent catalog entries

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A priced capability exposed by a service agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    /// Category label, e.g. "Pricing Oracle"
    #[serde(rename = "type")]
    pub category: String,
    pub icon: String,
    pub description: String,
    /// Nominal price per call in USDC
    pub price_per_call: Decimal,
    /// Callable endpoint path
    pub endpoint: String,
    /// Simulated latency label, e.g. "~200ms"
    pub latency: String,
    pub reputation: f32,
    pub capabilities: Vec<String>,
}

/// Display status of an agent during a sequence run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Active,
    Responding,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Active => write!(f, "active"),
            Self::Responding => write!(f, "responding"),
        }
    }
}
