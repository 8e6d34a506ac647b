//! PairAgent Agents - mock pay-per-call service agents
//!
//! Each agent turns a permissive JSON request into a canned (or lightly
//! randomized) JSON document. Agents never fail: missing or mistyped request
//! fields fall back to defaults.
//!
//! The HTTP surface lives in `pairagent-server`; this crate only builds the
//! documents and describes the artificial latency of each agent.

pub mod latency;
pub mod pricing;
pub mod routing;
pub mod slot;
pub mod weather;

pub use latency::LatencyProfile;

use chrono::{SecondsFormat, Utc};
use pairagent_registry::{
    AgentRegistry, DeviceProfile, PRICING_AGENT, ROUTING_AGENT, SLOT_AGENT, WEATHER_AGENT,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Network label reported in agent metadata
pub const AGENT_NETWORK: &str = "Base Sepolia";

/// Per-request context shared by all agents
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    pub device: DeviceProfile,
}

impl AgentContext {
    pub fn new(device: DeviceProfile) -> Self {
        Self { device }
    }
}

/// The four mock agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Pricing,
    Routing,
    Slot,
    Weather,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Pricing,
        AgentKind::Routing,
        AgentKind::Slot,
        AgentKind::Weather,
    ];

    /// Registry identifier
    pub fn agent_id(&self) -> &'static str {
        match self {
            Self::Pricing => PRICING_AGENT,
            Self::Routing => ROUTING_AGENT,
            Self::Slot => SLOT_AGENT,
            Self::Weather => WEATHER_AGENT,
        }
    }

    pub fn from_agent_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.agent_id() == id)
    }

    pub fn latency(&self) -> LatencyProfile {
        match self {
            Self::Pricing => LatencyProfile::new(150, 250),
            Self::Routing => LatencyProfile::new(200, 400),
            Self::Slot => LatencyProfile::new(250, 400),
            Self::Weather => LatencyProfile::new(100, 200),
        }
    }

    /// Build the response document for a request body
    pub fn respond(&self, body: &Value, ctx: &AgentContext) -> Value {
        match self {
            Self::Pricing => pricing::respond(&lenient(body)),
            Self::Routing => routing::respond(&lenient(body)),
            Self::Slot => slot::respond(&lenient(body), ctx),
            Self::Weather => weather::respond(&lenient(body)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.agent_id())
    }
}

/// Decode a request field by field; ill-typed fields take their defaults
pub(crate) fn lenient<T: DeserializeOwned + Default>(body: &Value) -> T {
    let decoded = pairagent_types::lenient::from_value(body);
    if !decoded.skipped.is_empty() {
        tracing::debug!(fields = ?decoded.skipped, "Ignoring ill-typed request fields");
    }
    decoded.value
}

/// Nominal price of an agent as a decimal string, e.g. "0.002"
pub(crate) fn declared_price(agent_id: &str) -> String {
    AgentRegistry::global()
        .price_of(agent_id)
        .map(|p| p.to_string())
        .unwrap_or_else(|| "0".to_string())
}

pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_agent_answers_empty_body() {
        let ctx = AgentContext::default();
        for kind in AgentKind::ALL {
            let doc = kind.respond(&json!({}), &ctx);
            let agent = AgentRegistry::global().get(kind.agent_id()).unwrap();

            assert_eq!(doc["agentId"], kind.agent_id());
            assert_eq!(doc["agent"], agent.name.as_str());
            assert_eq!(doc["_price"], agent.price_per_call.to_string());
            assert!(doc["recommendation"].as_str().is_some_and(|r| !r.is_empty()));
            assert!(doc["timestamp"].is_string());
            assert!(doc["metadata"].is_object());
        }
    }

    #[test]
    fn test_malformed_body_uses_defaults() {
        let ctx = AgentContext::default();
        for kind in AgentKind::ALL {
            let doc = kind.respond(&json!("not an object"), &ctx);
            assert_eq!(doc["agentId"], kind.agent_id());
        }
    }

    #[test]
    fn test_ill_typed_field_keeps_siblings() {
        let ctx = AgentContext::default();

        let doc = AgentKind::Routing.respond(
            &json!({"batteryLevel": 12.0, "destination": "gc7", "vehicleType": 7}),
            &ctx,
        );
        assert_eq!(doc["energyAnalysis"]["currentBattery"], "12%");
        assert_eq!(doc["metadata"]["vehicleType"], "EV");

        let doc = AgentKind::Weather.respond(&json!({"lat": 40.7, "lng": "west"}), &ctx);
        assert_eq!(doc["location"]["lat"], 40.7);
        assert_eq!(doc["location"]["lng"], pairagent_types::device::DEFAULT_LNG);
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(AgentKind::from_agent_id("slot-agent"), Some(AgentKind::Slot));
        assert_eq!(AgentKind::from_agent_id("nope"), None);
        assert_eq!(AgentKind::Weather.latency(), LatencyProfile::new(100, 200));
    }
}
