//! PairAgent Runner - the autonomous hire-and-pay loop
//!
//! [`SequenceRunner`] takes the next scenario, asks a [`PlanSource`] for a
//! plan, then hires each planned agent through a
//! [`PaymentExecutor`](pairagent_payments::PaymentExecutor), recording every
//! action, payment, and result in the [`DashboardState`].
//!
//! ```ignore
//! let registry = Arc::new(AgentRegistry::default_fleet());
//! let runner = SequenceRunner::new(
//!     registry.clone(),
//!     Arc::new(SimulatedExecutor::new("http://127.0.0.1:3000")),
//!     Arc::new(PairAgentClient::new("http://127.0.0.1:3000")),
//! );
//! let summary = runner.run_sequence().await?;
//! ```

pub mod client;
pub mod events;
pub mod pacing;
pub mod runner;
pub mod state;

pub use client::{ClientError, PairAgentClient, PlanSource, DEFAULT_SERVER_URL};
pub use events::DashboardEvent;
pub use pacing::Pacing;
pub use runner::{RunSummary, RunnerError, SequenceRunner, StepOutcome};
pub use state::{AgentState, DashboardState};
