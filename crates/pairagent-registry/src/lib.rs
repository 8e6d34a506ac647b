//! PairAgent Registry - the static agent catalog
//!
//! The registry holds the four hireable service agents in a fixed order and
//! answers lookups by identifier or endpoint path. It is read-only after
//! construction; [`AgentRegistry::global`] exposes a process-wide instance.

pub mod device;

pub use device::DeviceProfile;

use pairagent_types::{AgentConfig, PairAgentError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const PRICING_AGENT: &str = "pricing-agent";
pub const ROUTING_AGENT: &str = "routing-agent";
pub const WEATHER_AGENT: &str = "weather-agent";
pub const SLOT_AGENT: &str = "slot-agent";

static GLOBAL: OnceLock<AgentRegistry> = OnceLock::new();

/// Ordered, immutable catalog of service agents
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentConfig>,
}

impl AgentRegistry {
    pub fn new(agents: Vec<AgentConfig>) -> Self {
        Self { agents }
    }

    /// The built-in fleet: pricing, routing, weather, slot
    pub fn default_fleet() -> Self {
        Self::new(vec![
            agent(
                PRICING_AGENT,
                "ChargePricer",
                "Pricing Oracle",
                "⚡",
                "Real-time EV charging station price comparison across 12+ networks",
                dec!(0.002),
                "/api/agents/pricing",
                "~200ms",
                4.9,
                &["price_comparison", "rate_forecast", "surge_detection"],
            ),
            agent(
                ROUTING_AGENT,
                "PathFinder",
                "Route Optimizer",
                "🗺️",
                "AI-optimized routing with energy consumption modeling",
                dec!(0.005),
                "/api/agents/routing",
                "~400ms",
                4.7,
                &["route_optimization", "energy_modeling", "traffic_avoidance"],
            ),
            agent(
                WEATHER_AGENT,
                "AtmoSense",
                "Weather Intelligence",
                "🌦️",
                "Hyperlocal weather data affecting battery efficiency & route planning",
                dec!(0.001),
                "/api/agents/weather",
                "~150ms",
                4.8,
                &["weather_forecast", "efficiency_impact", "road_conditions"],
            ),
            agent(
                SLOT_AGENT,
                "SlotNegotiator",
                "Booking Agent",
                "📅",
                "Autonomous charging slot negotiation & reservation via A2A",
                dec!(0.003),
                "/api/agents/slot",
                "~350ms",
                4.6,
                &["slot_booking", "price_negotiation", "cancellation"],
            ),
        ])
    }

    /// Process-wide default fleet, built on first use
    pub fn global() -> &'static AgentRegistry {
        GLOBAL.get_or_init(|| {
            tracing::debug!("Initializing global agent registry");
            Self::default_fleet()
        })
    }

    /// All agents in catalog order
    pub fn agents(&self) -> &[AgentConfig] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Like [`get`](Self::get) but reports unknown ids as an error
    pub fn require(&self, id: &str) -> Result<&AgentConfig> {
        self.get(id).ok_or_else(|| PairAgentError::UnknownAgent {
            agent_id: id.to_string(),
        })
    }

    pub fn by_endpoint(&self, endpoint: &str) -> Option<&AgentConfig> {
        let endpoint = endpoint.trim_end_matches('/');
        self.agents.iter().find(|a| a.endpoint == endpoint)
    }

    pub fn price_of(&self, id: &str) -> Option<Decimal> {
        self.get(id).map(|a| a.price_per_call)
    }

    /// Sum of nominal prices. Unknown ids contribute nothing.
    pub fn total_price<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Decimal {
        ids.into_iter().filter_map(|id| self.price_of(id)).sum()
    }
}

/// Catalog listing served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryListing {
    pub device: DeviceProfile,
    pub agents: Vec<AgentConfig>,
    pub total: usize,
}

impl RegistryListing {
    pub fn new(registry: &AgentRegistry, device: DeviceProfile) -> Self {
        Self {
            device,
            agents: registry.agents().to_vec(),
            total: registry.len(),
        }
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::default_fleet()
    }
}

#[allow(clippy::too_many_arguments)]
fn agent(
    id: &str,
    name: &str,
    category: &str,
    icon: &str,
    description: &str,
    price_per_call: Decimal,
    endpoint: &str,
    latency: &str,
    reputation: f32,
    capabilities: &[&str],
) -> AgentConfig {
    AgentConfig {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        price_per_call,
        endpoint: endpoint.to_string(),
        latency: latency.to_string(),
        reputation,
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
    }
}
