//! PairAgent Orchestrator - the device's planning brain
//!
//! Given a [`DeviceState`], decide which agents to hire, in what order, and
//! with which parameters.
//!
//! - [`RulePlanner`]: three deterministic scenario templates, always available
//! - [`LlmPlanner`]: asks an LLM for a plan and validates it with [`PlanGuard`]
//! - [`PlanResolver`]: tries the primary planner and falls back to the rules
//!
//! The LLM may only *propose* a plan; nothing it returns is used until the
//! guard has checked it against the agent catalog.

pub mod guard;
pub mod llm;
pub mod resolver;
pub mod response;
pub mod rules;

pub use guard::{GuardConfig, GuardError, PlanGuard};
pub use llm::LlmPlanner;
pub use resolver::{PlanResolver, ResolvedPlan};
pub use response::{OrchestrateMetadata, OrchestrateResponse};
pub use rules::RulePlanner;

use async_trait::async_trait;
use pairagent_llm::LLMError;
use pairagent_types::{DeviceState, OrchestratorPlan, PlanningMethod};
use thiserror::Error;

/// Default estimated-time label
pub const DEFAULT_ESTIMATED_TIME: &str = "~12 seconds";

/// Errors that can occur while producing a plan
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LLMError),

    #[error("LLM plan rejected: {0}")]
    Rejected(#[from] GuardError),
}

/// A strategy that turns a device state into a plan
#[async_trait]
pub trait Planner: Send + Sync {
    fn name(&self) -> &'static str;

    /// How plans from this planner are labelled
    fn method(&self) -> PlanningMethod;

    async fn plan(&self, state: &DeviceState) -> Result<OrchestratorPlan, PlanError>;
}
