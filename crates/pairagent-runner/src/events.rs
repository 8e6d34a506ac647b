//! Dashboard events
//!
//! Every change to [`DashboardState`](crate::DashboardState) is expressed as
//! one of these events. The runner applies them through the reducer and
//! broadcasts them to observers (CLI, tests).

use chrono::{DateTime, Utc};
use pairagent_payments::PaymentMode;
use pairagent_types::{AgentStatus, LogEntry, Scenario};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DashboardEvent {
    /// A sequence run began
    RunStarted {
        scenario: Scenario,
        timestamp: DateTime<Utc>,
    },

    /// A sequence run ended and the scenario cycle advanced
    RunFinished {
        scenario: Scenario,
        steps_executed: usize,
        timestamp: DateTime<Utc>,
    },

    /// A log line was written
    LogAppended { entry: LogEntry },

    AgentStatusChanged {
        agent_id: String,
        status: AgentStatus,
    },

    /// An agent call was paid for
    PaymentRecorded {
        agent_id: String,
        amount: Decimal,
        tx_hash: String,
        on_chain: bool,
    },

    /// Battery level changed (recharge after a charge run)
    BatteryChanged { level: f64 },

    PaymentModeChanged { mode: PaymentMode },

    WalletConnected { address: String },
}

impl DashboardEvent {
    pub fn log(entry: LogEntry) -> Self {
        Self::LogAppended { entry }
    }

    pub fn status(agent_id: impl Into<String>, status: AgentStatus) -> Self {
        Self::AgentStatusChanged {
            agent_id: agent_id.into(),
            status,
        }
    }
}
