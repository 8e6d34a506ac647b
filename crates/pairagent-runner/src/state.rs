//! Dashboard application state and its reducer

use pairagent_payments::PaymentMode;
use pairagent_registry::AgentRegistry;
use pairagent_types::{AgentStatus, LogEntry, Scenario, LOG_CAPACITY};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use crate::DashboardEvent;

pub const INITIAL_BATTERY: f64 = 23.0;
pub const INITIAL_WALLET_BALANCE: Decimal = dec!(1.2847);
pub const MAX_CHARGE_LEVEL: f64 = 98.0;

/// Per-agent counters shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentState {
    pub calls: u32,
    pub status: AgentStatus,
}

/// Everything the dashboard displays. Only changed through [`apply`](Self::apply).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub battery: f64,
    pub wallet_balance: Decimal,
    pub total_spent: Decimal,
    pub total_transactions: u32,
    pub agents: BTreeMap<String, AgentState>,
    /// Newest first, capped at [`LOG_CAPACITY`]
    pub log: VecDeque<LogEntry>,
    pub running: bool,
    pub scenario_index: usize,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

impl DashboardState {
    pub fn new(registry: &AgentRegistry) -> Self {
        Self {
            battery: INITIAL_BATTERY,
            wallet_balance: INITIAL_WALLET_BALANCE,
            total_spent: Decimal::ZERO,
            total_transactions: 0,
            agents: registry
                .agents()
                .iter()
                .map(|a| (a.id.clone(), AgentState::default()))
                .collect(),
            log: VecDeque::with_capacity(LOG_CAPACITY),
            running: false,
            scenario_index: 0,
            payment_mode: PaymentMode::Simulated,
            wallet_address: None,
        }
    }

    pub fn with_battery(mut self, battery: f64) -> Self {
        self.battery = battery.clamp(0.0, 100.0);
        self
    }

    pub fn with_wallet_balance(mut self, balance: Decimal) -> Self {
        self.wallet_balance = balance;
        self
    }

    /// The scenario the next run will use
    pub fn next_scenario(&self) -> Scenario {
        Scenario::from_cycle_index(self.scenario_index)
    }

    pub fn wallet_balance_f64(&self) -> f64 {
        self.wallet_balance.to_f64().unwrap_or_default()
    }

    pub fn agent(&self, agent_id: &str) -> Option<&AgentState> {
        self.agents.get(agent_id)
    }

    /// Reducer: fold one event into the state
    pub fn apply(&mut self, event: &DashboardEvent) {
        match event {
            DashboardEvent::RunStarted { .. } => {
                self.running = true;
            }
            DashboardEvent::RunFinished { .. } => {
                self.running = false;
                self.scenario_index += 1;
            }
            DashboardEvent::LogAppended { entry } => {
                self.log.push_front(entry.clone());
                self.log.truncate(LOG_CAPACITY);
            }
            DashboardEvent::AgentStatusChanged { agent_id, status } => {
                self.agents.entry(agent_id.clone()).or_default().status = *status;
            }
            DashboardEvent::PaymentRecorded {
                agent_id, amount, ..
            } => {
                self.wallet_balance -= *amount;
                self.total_spent += *amount;
                self.total_transactions += 1;
                self.agents.entry(agent_id.clone()).or_default().calls += 1;
            }
            DashboardEvent::BatteryChanged { level } => {
                self.battery = level.clamp(0.0, 100.0);
            }
            DashboardEvent::PaymentModeChanged { mode } => {
                self.payment_mode = *mode;
            }
            DashboardEvent::WalletConnected { address } => {
                self.wallet_address = Some(address.clone());
            }
        }
    }
}
