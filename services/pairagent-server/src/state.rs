//! Application State

use pairagent_agents::AgentContext;
use pairagent_llm::LLMRouter;
use pairagent_orchestrator::PlanResolver;
use pairagent_registry::{AgentRegistry, DeviceProfile};
use std::sync::Arc;

use crate::config::{PaymentSettings, ServerConfig, DEFAULT_RECEIVING_WALLET};

/// Shared, read-only state for all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<AgentRegistry>,
    pub context: AgentContext,
    pub resolver: PlanResolver,
    pub simulate_latency: bool,
    pub payments: PaymentSettings,
    /// Wallet that receives agent payments
    pub pay_to: String,
}

impl AppState {
    /// Rule-based planning, latency on, gate open
    pub fn new(registry: Arc<AgentRegistry>, device: DeviceProfile) -> Self {
        Self {
            resolver: PlanResolver::rules(registry.clone()),
            registry,
            context: AgentContext::new(device),
            simulate_latency: true,
            payments: PaymentSettings::default(),
            pay_to: DEFAULT_RECEIVING_WALLET.to_string(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let registry = Arc::new(AgentRegistry::global().clone());
        let device = DeviceProfile::default().with_ids(
            config.identity.device_id.clone(),
            config.identity.erc8004_id.clone(),
        );

        let llm = LLMRouter::from_settings(&config.llm);
        match &llm {
            Some(router) => tracing::info!(provider = %router.kind(), "LLM planning enabled"),
            None => tracing::info!("No LLM provider configured, using rule-based planning"),
        }

        Self {
            resolver: PlanResolver::from_llm(llm, registry.clone()),
            registry,
            context: AgentContext::new(device),
            simulate_latency: config.agents.simulate_latency,
            payments: config.payments.clone(),
            pay_to: config.identity.pay_to(),
        }
    }

    pub fn with_latency(mut self, simulate_latency: bool) -> Self {
        self.simulate_latency = simulate_latency;
        self
    }

    pub fn with_resolver(mut self, resolver: PlanResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_payments(mut self, payments: PaymentSettings, pay_to: impl Into<String>) -> Self {
        self.payments = payments;
        self.pay_to = pay_to.into();
        self
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.context.device
    }
}
