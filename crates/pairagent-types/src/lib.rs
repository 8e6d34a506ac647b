//! PairAgent Types - Core data model
//!
//! This crate is the foundation layer shared by every other PairAgent crate:
//!
//! - [`DeviceState`]: snapshot of the EV used as planning input
//! - [`OrchestratorPlan`] / [`OrchestratorStep`]: the ordered agent-hiring plan
//! - [`AgentConfig`]: a priced capability exposed by a mock service agent
//! - [`LogEntry`]: a single line of the sequence runner's activity log
//!
//! Prices are `rust_decimal::Decimal` values in USDC so that spend totals
//! stay exact.

pub mod agent;
pub mod device;
pub mod error;
pub mod lenient;
pub mod log;
pub mod money;
pub mod plan;

pub use agent::{AgentConfig, AgentStatus};
pub use device::{DeviceState, GeoPoint, Scenario, CRITICAL_BATTERY_THRESHOLD};
pub use error::{PairAgentError, Result};
pub use lenient::Lenient;
pub use log::{LogEntry, LogKind, LOG_CAPACITY};
pub use money::format_usdc;
pub use plan::{OrchestratorPlan, OrchestratorStep, PlanningMethod, StepParams};
