//! LLM-backed planner

use async_trait::async_trait;
use pairagent_llm::{CompletionRequest, LLMRouter};
use pairagent_registry::AgentRegistry;
use pairagent_types::{DeviceState, OrchestratorPlan, PlanningMethod};
use std::sync::Arc;

use crate::{PlanError, PlanGuard, Planner};

const PLAN_TEMPERATURE: f32 = 0.3;
const PLAN_MAX_TOKENS: u32 = 1024;

/// Asks an LLM for a plan and validates it before use
pub struct LlmPlanner {
    llm: LLMRouter,
    guard: PlanGuard,
    registry: Arc<AgentRegistry>,
}

impl LlmPlanner {
    pub fn new(llm: LLMRouter, registry: Arc<AgentRegistry>) -> Self {
        Self {
            llm,
            guard: PlanGuard::new(registry.clone()),
            registry,
        }
    }

    pub fn system_prompt(&self) -> String {
        let catalog = self
            .registry
            .agents()
            .iter()
            .map(|a| {
                format!(
                    "- {} ({}): {}, ${}/call",
                    a.id, a.name, a.category, a.price_per_call
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are the AI brain of an autonomous EV (PairAgent). You decide which AI agents to hire and in what order.

Available agents:
{catalog}

Respond with JSON: {{ "trigger": "string", "reasoning": "string", "steps": [{{"agentId": "string", "agentName": "string", "action": "string describing what the agent will do", "params": {{}}}}], "estimatedCost": "string", "estimatedTime": "string" }}"#
        )
    }

    pub fn user_prompt(state: &DeviceState) -> String {
        let goal = match state.scenario.as_deref() {
            Some(s) if !s.trim().is_empty() => format!("Scenario: {}", s),
            _ => "Decide the best action.".to_string(),
        };
        format!(
            "Device state: Battery {}%, location ({}, {}), wallet {} USDC. {}",
            state.battery_level, state.location.lat, state.location.lng, state.wallet_balance, goal
        )
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn method(&self) -> PlanningMethod {
        PlanningMethod::Llm
    }

    async fn plan(&self, state: &DeviceState) -> Result<OrchestratorPlan, PlanError> {
        let request = CompletionRequest::new(self.system_prompt(), Self::user_prompt(state))
            .with_temperature(PLAN_TEMPERATURE)
            .with_max_tokens(PLAN_MAX_TOKENS)
            .json();

        let completion = self.llm.complete(request).await?;
        let plan = self.guard.parse_plan(&completion.content)?;

        tracing::info!(
            provider = self.llm.provider_name(),
            model = %completion.model,
            tokens = ?completion.total_tokens,
            steps = plan.steps.len(),
            "LLM plan accepted"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairagent_llm::{Completion, LLMProvider, ProviderKind, Result as LLMResult};
    use pairagent_types::Scenario;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns a fixed completion and records the last request
    struct CannedProvider {
        content: String,
        last: Mutex<Option<CompletionRequest>>,
    }

    #[async_trait]
    impl LLMProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "Canned"
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAICompat
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, request: CompletionRequest) -> LLMResult<Completion> {
            *self.last.lock().unwrap() = Some(request);
            Ok(Completion::new(self.content.clone(), "canned"))
        }
    }

    fn planner(content: String) -> (LlmPlanner, Arc<CannedProvider>) {
        let provider = Arc::new(CannedProvider {
            content,
            last: Mutex::new(None),
        });
        let planner = LlmPlanner::new(
            LLMRouter::new(provider.clone()),
            Arc::new(AgentRegistry::default_fleet()),
        );
        (planner, provider)
    }

    #[tokio::test]
    async fn test_llm_plan_accepted() {
        let content = json!({
            "trigger": "Low battery",
            "reasoning": "Find the cheapest charger",
            "steps": [{"agentId": "pricing-agent", "agentName": "x", "action": "Scan prices", "params": {"radius": 3}}],
            "estimatedCost": "$0.002",
            "estimatedTime": "~3 seconds"
        })
        .to_string();
        let (planner, provider) = planner(content);

        let state = DeviceState::new(15.0, 1.0).with_scenario(Scenario::Charge);
        let plan = planner.plan(&state).await.unwrap();

        assert_eq!(plan.steps[0].agent_name, "ChargePricer");
        assert_eq!(plan.estimated_cost, "$0.002");

        let request = provider.last.lock().unwrap().clone().unwrap();
        assert!(request.json_mode);
        assert_eq!(request.temperature, Some(PLAN_TEMPERATURE));
        assert!(request.system.contains("slot-agent (SlotNegotiator)"));
        assert!(request.prompt.contains("Scenario: charge"));
    }

    #[tokio::test]
    async fn test_llm_garbage_rejected() {
        let (planner, _) = planner("I think you should charge.".to_string());
        let err = planner.plan(&DeviceState::default()).await.unwrap_err();
        assert!(matches!(err, PlanError::Rejected(_)));
    }

    #[test]
    fn test_user_prompt_without_scenario() {
        let prompt = LlmPlanner::user_prompt(&DeviceState::new(23.0, 1.5));
        assert_eq!(
            prompt,
            "Device state: Battery 23%, location (37.785, -122.409), wallet 1.5 USDC. Decide the best action."
        );
    }
}
