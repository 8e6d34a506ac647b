//! `pairagent plan` - ask the orchestrator what it would do

use std::sync::Arc;

use colored::*;
use pairagent_llm::LLMRouter;
use pairagent_orchestrator::PlanResolver;
use pairagent_registry::AgentRegistry;
use pairagent_runner::{PairAgentClient, PlanSource};
use pairagent_types::{DeviceState, Scenario};

use crate::display;

pub async fn show_plan(
    server: &str,
    local: bool,
    battery: f64,
    wallet: f64,
    scenario: Option<String>,
) -> anyhow::Result<()> {
    let scenario = Scenario::parse(scenario.as_deref());
    let state = DeviceState::new(battery, wallet).with_scenario(scenario);

    display::section(&format!("Plan · {} · battery {:.0}%", scenario, battery));

    let resolved = if local {
        let registry = Arc::new(AgentRegistry::global().clone());
        let resolver = PlanResolver::from_llm(LLMRouter::from_env(), registry);
        resolver.fetch_plan(&state).await?
    } else {
        PairAgentClient::new(server).fetch_plan(&state).await?
    };

    display::plan(&resolved.plan);
    display::kv("Planning method", &resolved.planning_method.to_string());
    if state.is_critical() {
        println!();
        println!("  {}", "Battery critical: slot booking is flagged as priority".bright_red());
    }
    Ok(())
}
