//! Plan Guard - validates LLM-proposed plans
//!
//! Everything an LLM returns is untrusted. The guard parses the raw
//! completion, rejects plans that reference unknown agents or are malformed,
//! and normalizes what it accepts against the agent catalog.

use pairagent_registry::AgentRegistry;
use pairagent_types::{format_usdc, OrchestratorPlan, OrchestratorStep, StepParams};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::DEFAULT_ESTIMATED_TIME;

/// Reasons a proposed plan is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuardError {
    #[error("Invalid JSON structure: {message}")]
    InvalidJson { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Plan has no steps")]
    EmptyPlan,

    #[error("Plan has {count} steps (maximum {max})")]
    TooManySteps { count: usize, max: usize },

    #[error("Step {index} references unknown agent '{agent_id}'")]
    UnknownAgent { index: usize, agent_id: String },

    #[error("Step {index} has no action")]
    MissingAction { index: usize },

    #[error("Step {index} params must be a JSON object")]
    InvalidParams { index: usize },

    #[error("Potential injection detected: {pattern}")]
    InjectionDetected { pattern: String },
}

pub type Result<T> = std::result::Result<T, GuardError>;

/// Configuration for the guard
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub max_steps: usize,
    /// Phrases that indicate the model was steered off task
    pub injection_patterns: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_steps: 8,
            injection_patterns: vec![
                "ignore previous".to_string(),
                "ignore all".to_string(),
                "disregard".to_string(),
                "system prompt".to_string(),
                "you are now".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposedPlan {
    #[serde(default)]
    trigger: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    steps: Option<Vec<ProposedStep>>,
    #[serde(default)]
    estimated_cost: Option<String>,
    #[serde(default)]
    estimated_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposedStep {
    #[serde(default)]
    agent_id: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    params: Option<Value>,
}

/// Validator for LLM-produced plans
#[derive(Debug, Clone)]
pub struct PlanGuard {
    config: GuardConfig,
    registry: Arc<AgentRegistry>,
}

impl PlanGuard {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self::with_config(registry, GuardConfig::default())
    }

    pub fn with_config(registry: Arc<AgentRegistry>, config: GuardConfig) -> Self {
        Self { config, registry }
    }

    fn check_injection(&self, text: &str) -> Result<()> {
        let lower = text.to_lowercase();
        for pattern in &self.config.injection_patterns {
            if lower.contains(pattern.as_str()) {
                return Err(GuardError::InjectionDetected {
                    pattern: pattern.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a raw completion into a plan
    pub fn parse_plan(&self, raw: &str) -> Result<OrchestratorPlan> {
        let json = strip_code_fence(raw);
        self.check_injection(json)?;

        let proposed: ProposedPlan =
            serde_json::from_str(json).map_err(|e| GuardError::InvalidJson {
                message: e.to_string(),
            })?;

        self.validate(proposed)
    }

    fn validate(&self, proposed: ProposedPlan) -> Result<OrchestratorPlan> {
        let trigger = required(proposed.trigger, "trigger")?;
        let reasoning = required(proposed.reasoning, "reasoning")?;

        let proposed_steps = proposed.steps.unwrap_or_default();
        if proposed_steps.is_empty() {
            return Err(GuardError::EmptyPlan);
        }
        if proposed_steps.len() > self.config.max_steps {
            return Err(GuardError::TooManySteps {
                count: proposed_steps.len(),
                max: self.config.max_steps,
            });
        }

        let mut steps = Vec::with_capacity(proposed_steps.len());
        for (index, step) in proposed_steps.into_iter().enumerate() {
            let agent_id = step.agent_id.trim();
            let agent = self
                .registry
                .get(agent_id)
                .ok_or_else(|| GuardError::UnknownAgent {
                    index,
                    agent_id: step.agent_id.clone(),
                })?;

            let action = step
                .action
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .ok_or(GuardError::MissingAction { index })?;

            let params = match step.params {
                None | Some(Value::Null) => StepParams::new(),
                Some(Value::Object(map)) => map,
                Some(_) => return Err(GuardError::InvalidParams { index }),
            };

            steps.push(OrchestratorStep {
                agent_id: agent.id.clone(),
                agent_name: agent.name.clone(),
                action,
                params,
            });
        }

        let estimated_cost = proposed
            .estimated_cost
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| {
                format_usdc(
                    self.registry
                        .total_price(steps.iter().map(|s| s.agent_id.as_str())),
                )
            });

        let estimated_time = proposed
            .estimated_time
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ESTIMATED_TIME.to_string());

        Ok(OrchestratorPlan {
            trigger,
            reasoning,
            steps,
            estimated_cost,
            estimated_time,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| GuardError::MissingField {
            field: field.to_string(),
        })
}

/// Models sometimes wrap JSON in a markdown fence even in JSON mode
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
