//! Orchestrator plans

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Free-form parameters passed to the target agent
pub type StepParams = Map<String, Value>;

/// One agent invocation in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorStep {
    /// Registry identifier of the agent to hire
    pub agent_id: String,
    /// Display name of the agent
    pub agent_name: String,
    /// Human-readable description of what the agent will do
    pub action: String,
    #[serde(default)]
    pub params: StepParams,
}

impl OrchestratorStep {
    /// Build a step. Non-object `params` values are replaced by an empty map.
    pub fn new(
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
        action: impl Into<String>,
        params: Value,
    ) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => StepParams::new(),
        };
        Self {
            agent_id: agent_id.into(),
            agent_name: agent_name.into(),
            action: action.into(),
            params,
        }
    }

    /// The params as a JSON value, ready to send as a request body
    pub fn body(&self) -> Value {
        Value::Object(self.params.clone())
    }
}

/// An ordered agent-hiring plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorPlan {
    pub trigger: String,
    pub reasoning: String,
    pub steps: Vec<OrchestratorStep>,
    /// Formatted total, e.g. `$0.0110`
    pub estimated_cost: String,
    pub estimated_time: String,
}

impl OrchestratorPlan {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Agent identifiers in execution order
    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.agent_id.as_str())
    }

    pub fn first_agent(&self) -> Option<&str> {
        self.agent_ids().next()
    }
}

/// How a plan was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanningMethod {
    #[serde(rename = "llm")]
    Llm,
    #[serde(rename = "rule-based")]
    RuleBased,
}

impl fmt::Display for PlanningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Llm => write!(f, "llm"),
            Self::RuleBased => write!(f, "rule-based"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_params_must_be_object() {
        let step = OrchestratorStep::new("weather-agent", "AtmoSense", "Check", json!([1, 2]));
        assert!(step.params.is_empty());

        let step = OrchestratorStep::new("weather-agent", "AtmoSense", "Check", json!({"lat": 1.0}));
        assert_eq!(step.body(), json!({"lat": 1.0}));
    }

    #[test]
    fn test_plan_wire_format() {
        let plan = OrchestratorPlan {
            trigger: "t".to_string(),
            reasoning: "r".to_string(),
            steps: vec![OrchestratorStep::new("slot-agent", "SlotNegotiator", "Book", json!({}))],
            estimated_cost: "$0.0030".to_string(),
            estimated_time: "~12 seconds".to_string(),
        };

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["estimatedCost"], "$0.0030");
        assert_eq!(value["steps"][0]["agentId"], "slot-agent");
        assert_eq!(plan.first_agent(), Some("slot-agent"));
    }

    #[test]
    fn test_planning_method_labels() {
        assert_eq!(serde_json::to_value(PlanningMethod::RuleBased).unwrap(), "rule-based");
        assert_eq!(PlanningMethod::Llm.to_string(), "llm");
    }
}
