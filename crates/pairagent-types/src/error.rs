//! Shared error type

use thiserror::Error;

/// Errors raised by the PairAgent data model and catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PairAgentError {
    #[error("Unknown agent: {agent_id}")]
    UnknownAgent { agent_id: String },
}

pub type Result<T> = std::result::Result<T, PairAgentError>;
