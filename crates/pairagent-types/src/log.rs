//! Activity log entries produced by the sequence runner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of entries kept in the log ring buffer
pub const LOG_CAPACITY: usize = 100;

/// Category of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    System,
    Action,
    Payment,
    Result,
    Error,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::System => "system",
            Self::Action => "action",
            Self::Payment => "payment",
            Self::Result => "result",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A single entry in the activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub kind: LogKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub icon: String,
}

impl LogEntry {
    fn build(kind: LogKind, agent_id: Option<String>, message: String, icon: &str) -> Self {
        Self {
            id: format!("log_{}", uuid::Uuid::new_v4()),
            kind,
            agent_id,
            message,
            tx_hash: None,
            timestamp: Utc::now(),
            icon: icon.to_string(),
        }
    }

    pub fn system(message: impl Into<String>, icon: &str) -> Self {
        Self::build(LogKind::System, None, message.into(), icon)
    }

    pub fn action(agent_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(LogKind::Action, Some(agent_id.into()), message.into(), "→")
    }

    pub fn payment(
        agent_id: impl Into<String>,
        message: impl Into<String>,
        tx_hash: impl Into<String>,
    ) -> Self {
        let mut entry = Self::build(LogKind::Payment, Some(agent_id.into()), message.into(), "💰");
        entry.tx_hash = Some(tx_hash.into());
        entry
    }

    pub fn result(agent_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(LogKind::Result, Some(agent_id.into()), message.into(), "✓")
    }

    pub fn error(agent_id: Option<String>, message: impl Into<String>) -> Self {
        Self::build(LogKind::Error, agent_id, message.into(), "⚠️")
    }

    /// Attach an agent to a system entry
    pub fn for_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}
