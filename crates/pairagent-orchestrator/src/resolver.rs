//! Two-stage plan resolution

use pairagent_registry::AgentRegistry;
use pairagent_types::{DeviceState, OrchestratorPlan, PlanningMethod};
use serde::Serialize;
use std::sync::Arc;

use crate::{LlmPlanner, Planner, RulePlanner};

/// A plan together with how it was produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlan {
    pub plan: OrchestratorPlan,
    pub planning_method: PlanningMethod,
}

/// Tries a primary planner and falls back to the rule planner.
///
/// Resolution never fails: any primary error is logged and replaced with the
/// deterministic plan for the same state.
#[derive(Clone)]
pub struct PlanResolver {
    primary: Option<Arc<dyn Planner>>,
    fallback: RulePlanner,
}

impl PlanResolver {
    /// Rule-based planning only
    pub fn rules(registry: Arc<AgentRegistry>) -> Self {
        Self {
            primary: None,
            fallback: RulePlanner::new(registry),
        }
    }

    pub fn with_primary(mut self, primary: Arc<dyn Planner>) -> Self {
        self.primary = Some(primary);
        self
    }

    /// LLM planning when a router is available, rules otherwise
    pub fn from_llm(llm: Option<pairagent_llm::LLMRouter>, registry: Arc<AgentRegistry>) -> Self {
        let resolver = Self::rules(registry.clone());
        match llm {
            Some(router) => resolver.with_primary(Arc::new(LlmPlanner::new(router, registry))),
            None => resolver,
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn resolve(&self, state: &DeviceState) -> ResolvedPlan {
        if let Some(primary) = &self.primary {
            match primary.plan(state).await {
                Ok(plan) => {
                    return ResolvedPlan {
                        plan,
                        planning_method: primary.method(),
                    }
                }
                Err(e) => {
                    tracing::warn!("Planner {} failed: {}, using rule-based plan", primary.name(), e);
                }
            }
        }

        ResolvedPlan {
            plan: self.fallback.create_plan(state),
            planning_method: PlanningMethod::RuleBased,
        }
    }
}

impl std::fmt::Debug for PlanResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanResolver")
            .field("primary", &self.primary.as_ref().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GuardError, PlanError};
    use async_trait::async_trait;
    use pairagent_types::{OrchestratorStep, Scenario};
    use serde_json::json;

    struct FailingPlanner;

    #[async_trait]
    impl Planner for FailingPlanner {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn method(&self) -> PlanningMethod {
            PlanningMethod::Llm
        }

        async fn plan(&self, _state: &DeviceState) -> Result<OrchestratorPlan, PlanError> {
            Err(PlanError::Rejected(GuardError::EmptyPlan))
        }
    }

    struct FixedPlanner;

    #[async_trait]
    impl Planner for FixedPlanner {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn method(&self) -> PlanningMethod {
            PlanningMethod::Llm
        }

        async fn plan(&self, _state: &DeviceState) -> Result<OrchestratorPlan, PlanError> {
            Ok(OrchestratorPlan {
                trigger: "t".into(),
                reasoning: "r".into(),
                steps: vec![OrchestratorStep::new("slot-agent", "SlotNegotiator", "Book", json!({}))],
                estimated_cost: "$0.0030".into(),
                estimated_time: "~2 seconds".into(),
            })
        }
    }

    fn registry() -> Arc<AgentRegistry> {
        Arc::new(AgentRegistry::default_fleet())
    }

    #[tokio::test]
    async fn test_rules_only() {
        let resolver = PlanResolver::rules(registry());
        let resolved = resolver.resolve(&DeviceState::default()).await;

        assert_eq!(resolved.planning_method, PlanningMethod::RuleBased);
        assert_eq!(resolved.plan.step_count(), 4);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let resolver = PlanResolver::rules(registry()).with_primary(Arc::new(FailingPlanner));
        let state = DeviceState::default().with_scenario(Scenario::Fleet);
        let resolved = resolver.resolve(&state).await;

        assert_eq!(resolved.planning_method, PlanningMethod::RuleBased);
        assert_eq!(resolved.plan, RulePlanner::new(registry()).create_plan(&state));
    }

    #[tokio::test]
    async fn test_primary_success_reports_llm() {
        let resolver = PlanResolver::rules(registry()).with_primary(Arc::new(FixedPlanner));
        let resolved = resolver.resolve(&DeviceState::default()).await;

        assert_eq!(resolved.planning_method, PlanningMethod::Llm);
        assert_eq!(resolved.plan.first_agent(), Some("slot-agent"));
    }

    #[test]
    fn test_no_router_means_rules_only() {
        assert!(!PlanResolver::from_llm(None, registry()).has_primary());
    }
}
