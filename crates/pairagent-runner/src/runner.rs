//! The autonomous hire-and-pay sequence

use chrono::Utc;
use pairagent_payments::{PaymentExecutor, PaymentMode, WalletConnector};
use pairagent_registry::AgentRegistry;
use pairagent_types::{
    format_usdc, AgentConfig, AgentStatus, DeviceState, GeoPoint, LogEntry, OrchestratorStep,
    PlanningMethod, Scenario,
};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

use crate::pacing::pause;
use crate::{DashboardEvent, DashboardState, Pacing, PlanSource};
use crate::state::MAX_CHARGE_LEVEL;

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub const FALLBACK_RECOMMENDATION: &str = "Agent responded successfully (fallback).";
pub const DEFAULT_RESULT_MESSAGE: &str = "Task completed successfully.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("A sequence is already running")]
    AlreadyRunning,
}

/// What one run did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub scenario: Scenario,
    /// `None` when no plan could be obtained
    pub planning_method: Option<PlanningMethod>,
    pub steps_planned: usize,
    pub steps_executed: usize,
    pub failed_calls: usize,
    pub spent: Decimal,
    pub battery_before: f64,
    pub battery_after: f64,
}

/// Drives plan → hire → pay → log, one step at a time.
///
/// State lives behind a lock and is only changed by [`DashboardState::apply`];
/// each applied event is also broadcast to subscribers.
pub struct SequenceRunner {
    state: RwLock<DashboardState>,
    registry: Arc<AgentRegistry>,
    executor: Arc<dyn PaymentExecutor>,
    plan_source: Arc<dyn PlanSource>,
    pacing: Pacing,
    events: broadcast::Sender<DashboardEvent>,
}

impl SequenceRunner {
    pub fn new(
        registry: Arc<AgentRegistry>,
        executor: Arc<dyn PaymentExecutor>,
        plan_source: Arc<dyn PlanSource>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut state = DashboardState::new(&registry);
        state.payment_mode = executor.mode();

        Self {
            state: RwLock::new(state),
            registry,
            executor,
            plan_source,
            pacing: Pacing::default(),
            events,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replace the starting state.
    ///
    /// The payment mode is taken from the executor, and registry agents the
    /// state does not track yet start with zeroed counters.
    pub fn with_state(mut self, mut state: DashboardState) -> Self {
        state.payment_mode = self.executor.mode();
        for agent in self.registry.agents() {
            state.agents.entry(agent.id.clone()).or_default();
        }
        self.state = RwLock::new(state);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.executor.mode()
    }

    async fn emit(&self, event: DashboardEvent) {
        self.state.write().await.apply(&event);
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn log(&self, entry: LogEntry) {
        self.emit(DashboardEvent::log(entry)).await;
    }

    async fn set_status(&self, agent_id: &str, status: AgentStatus) {
        self.emit(DashboardEvent::status(agent_id, status)).await;
    }

    /// Validate the configured payer wallet and log the outcome.
    ///
    /// A failure is logged as an error entry and leaves the payment mode alone.
    pub async fn connect_wallet(&self, connector: &WalletConnector) -> bool {
        match connector.connect() {
            Ok(address) => {
                let mode = self.executor.mode();
                self.emit(DashboardEvent::WalletConnected {
                    address: address.as_str().to_string(),
                })
                .await;
                self.emit(DashboardEvent::PaymentModeChanged { mode }).await;
                let suffix = if mode.is_on_chain() {
                    "Live x402 payments enabled"
                } else {
                    "Running in simulation mode"
                };
                self.log(LogEntry::system(
                    format!("🔗 Wallet connected: {} | {}", address.short(), suffix),
                    "🔗",
                ))
                .await;
                true
            }
            Err(e) => {
                tracing::warn!("Wallet connection failed: {}", e);
                self.log(LogEntry::error(
                    None,
                    format!("Wallet connection failed: {}. Using simulation mode.", e),
                ))
                .await;
                false
            }
        }
    }

    /// Run one autonomous sequence for the next scenario in the cycle
    pub async fn run_sequence(&self) -> Result<RunSummary, RunnerError> {
        let (scenario, device) = {
            let mut state = self.state.write().await;
            if state.running {
                return Err(RunnerError::AlreadyRunning);
            }
            let scenario = state.next_scenario();
            let event = DashboardEvent::RunStarted {
                scenario,
                timestamp: Utc::now(),
            };
            state.apply(&event);
            let _ = self.events.send(event);

            let device = DeviceState::new(state.battery, state.wallet_balance_f64())
                .with_location(GeoPoint::default())
                .with_scenario(scenario);
            (scenario, device)
        };

        let mode = self.executor.mode();
        tracing::info!(scenario = %scenario, mode = %mode, "Starting autonomous sequence");

        let mode_label = if mode.is_on_chain() { "LIVE x402" } else { "Simulated" };
        self.log(LogEntry::system(
            format!("🧠 Orchestrator analyzing device state... [Mode: {}]", mode_label),
            "🧠",
        ))
        .await;
        pause(self.pacing.analyze).await;

        let mut summary = RunSummary {
            scenario,
            planning_method: None,
            steps_planned: 0,
            steps_executed: 0,
            failed_calls: 0,
            spent: Decimal::ZERO,
            battery_before: device.battery_level,
            battery_after: device.battery_level,
        };

        match self.plan_source.fetch_plan(&device).await {
            Ok(resolved) => {
                let plan = resolved.plan;
                summary.planning_method = Some(resolved.planning_method);
                summary.steps_planned = plan.step_count();

                self.log(LogEntry::system(plan.trigger.clone(), "🚨")).await;
                self.log(LogEntry::system(
                    format!(
                        "Plan: {} agents to hire | Est. cost: {}",
                        plan.step_count(),
                        plan.estimated_cost
                    ),
                    "📋",
                ))
                .await;
                pause(self.pacing.plan_review).await;

                for step in &plan.steps {
                    let Some(agent) = self.registry.get(&step.agent_id) else {
                        tracing::warn!(agent_id = %step.agent_id, "Skipping step for unknown agent");
                        continue;
                    };
                    let outcome = self.execute_step(step, agent).await;
                    summary.steps_executed += 1;
                    summary.spent += agent.price_per_call;
                    if outcome.fallback {
                        summary.failed_calls += 1;
                    }
                }

                if scenario == Scenario::Charge {
                    let gain = rand::thread_rng().gen_range(35..=54) as f64;
                    let level = (device.battery_level + gain).min(MAX_CHARGE_LEVEL);
                    self.emit(DashboardEvent::BatteryChanged { level }).await;
                    summary.battery_after = level;
                }
            }
            Err(e) => {
                tracing::error!("Failed to obtain plan: {}", e);
                self.log(LogEntry::error(
                    None,
                    format!("Orchestrator unavailable: {}. No agents hired.", e),
                ))
                .await;
            }
        }

        let settlement = if mode.is_on_chain() {
            "settled ON-CHAIN on SKALE Base Sepolia"
        } else {
            "simulated"
        };
        self.log(LogEntry::system(
            format!("✅ Autonomous sequence complete. All x402 payments {}.", settlement),
            "✅",
        ))
        .await;

        self.emit(DashboardEvent::RunFinished {
            scenario,
            steps_executed: summary.steps_executed,
            timestamp: Utc::now(),
        })
        .await;

        tracing::info!(
            scenario = %scenario,
            steps = summary.steps_executed,
            spent = %summary.spent,
            "Autonomous sequence finished"
        );
        Ok(summary)
    }

    /// Hire one agent: call it through the executor, record the payment, log the result.
    ///
    /// Never fails; a failed call is logged and replaced with a fallback response.
    pub async fn execute_step(&self, step: &OrchestratorStep, agent: &AgentConfig) -> StepOutcome {
        self.set_status(&agent.id, AgentStatus::Active).await;
        self.log(LogEntry::action(&agent.id, step.action.clone())).await;
        pause(self.pacing.think()).await;

        let mode = self.executor.mode();
        if mode.is_on_chain() {
            self.log(
                LogEntry::system("Initiating x402 payment...", "🔐").for_agent(&agent.id),
            )
            .await;
        }

        let (data, tx_hash, on_chain, fallback) =
            match self.executor.execute(agent, &step.body()).await {
                Ok(call) => (
                    call.data,
                    call.receipt.tx_hash,
                    mode.is_on_chain(),
                    false,
                ),
                Err(e) => {
                    tracing::warn!(agent_id = %agent.id, "Agent call failed: {}", e);
                    self.log(LogEntry::error(
                        Some(agent.id.clone()),
                        format!("Payment/call failed: {}. Using cached response.", e),
                    ))
                    .await;
                    (
                        json!({ "recommendation": FALLBACK_RECOMMENDATION }),
                        pairagent_payments::generate_tx_hash(),
                        false,
                        true,
                    )
                }
            };

        let price = agent.price_per_call;
        let marker = if on_chain { " ✅ ON-CHAIN" } else { " (simulated)" };
        self.log(LogEntry::payment(
            &agent.id,
            format!("x402 Payment: {} USDC → {}{}", format_usdc(price), agent.name, marker),
            tx_hash.clone(),
        ))
        .await;
        self.emit(DashboardEvent::PaymentRecorded {
            agent_id: agent.id.clone(),
            amount: price,
            tx_hash: tx_hash.clone(),
            on_chain,
        })
        .await;

        self.set_status(&agent.id, AgentStatus::Responding).await;
        pause(self.pacing.respond).await;

        let message = data
            .get("recommendation")
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_RESULT_MESSAGE)
            .to_string();
        self.log(LogEntry::result(&agent.id, message)).await;
        self.set_status(&agent.id, AgentStatus::Idle).await;
        pause(self.pacing.cooldown).await;

        StepOutcome {
            data,
            tx_hash,
            on_chain,
            fallback,
        }
    }
}

/// Result of hiring one agent
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub data: Value,
    pub tx_hash: String,
    pub on_chain: bool,
    /// The call failed and the fallback response was used
    pub fallback: bool,
}
