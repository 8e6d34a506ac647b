//! PairAgent Payments - x402 pay-per-call execution
//!
//! Every agent call goes through a [`PaymentExecutor`]. Two implementations
//! are provided and one is chosen at startup:
//!
//! - [`SimulatedExecutor`]: plain POST, fabricated transaction hash
//! - [`OnChainExecutor`]: POST, answer an HTTP 402 challenge with an
//!   `X-PAYMENT` header, retry once, read the settlement header
//!
//! No funds move and no signature is produced; the on-chain executor only
//! speaks the x402 header protocol.

pub mod onchain;
pub mod simulated;
pub mod wallet;
pub mod x402;

pub use onchain::OnChainExecutor;
pub use simulated::SimulatedExecutor;
pub use wallet::{WalletAddress, WalletConnector, WalletError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pairagent_types::AgentConfig;
use rand::RngCore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while calling a paid agent
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Agent returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid agent response: {message}")]
    InvalidResponse { message: String },

    #[error("Payment required but not accepted: {message}")]
    PaymentRejected { message: String },

    #[error("Malformed payment header: {message}")]
    MalformedHeader { message: String },

    #[error("On-chain payments need a connected wallet")]
    WalletRequired,
}

pub type Result<T> = std::result::Result<T, PaymentError>;

impl From<reqwest::Error> for PaymentError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network {
            message: e.to_string(),
        }
    }
}

/// How agent calls are paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Simulated,
    #[serde(alias = "real", alias = "on-chain")]
    OnChain,
}

impl PaymentMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simulated" | "sim" => Some(Self::Simulated),
            "onchain" | "on-chain" | "real" | "live" => Some(Self::OnChain),
            _ => None,
        }
    }

    pub fn is_on_chain(&self) -> bool {
        matches!(self, Self::OnChain)
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::OnChain => write!(f, "onchain"),
        }
    }
}

/// Record of one payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub success: bool,
    pub tx_hash: String,
    /// Amount in USDC
    pub amount: Decimal,
    pub network: String,
    /// Whether a settlement header from the agent confirmed the payment
    pub settled: bool,
    pub timestamp: DateTime<Utc>,
}

/// An agent response together with its payment receipt
#[derive(Debug, Clone)]
pub struct PaidCall {
    pub data: Value,
    pub receipt: PaymentReceipt,
    pub latency: Duration,
}

impl PaidCall {
    /// The agent's recommendation text, if it sent one
    pub fn recommendation(&self) -> Option<&str> {
        self.data.get("recommendation").and_then(Value::as_str)
    }
}

/// Capability to invoke a priced agent endpoint
#[async_trait]
pub trait PaymentExecutor: Send + Sync {
    fn mode(&self) -> PaymentMode;

    /// POST `params` to the agent's endpoint and pay for the call
    async fn execute(&self, agent: &AgentConfig, params: &Value) -> Result<PaidCall>;
}

/// A random transaction hash: `0x` followed by 64 hex digits
pub fn generate_tx_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Shorten a hash or address for display, e.g. `0x1a2b...9f8e`
pub fn short_hash(hash: &str) -> String {
    if hash.len() <= 12 {
        return hash.to_string();
    }
    match (hash.get(..6), hash.get(hash.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => hash.to_string(),
    }
}

/// The price an agent declared in its response (`_price`), if readable
pub(crate) fn declared_price(data: &Value) -> Option<Decimal> {
    match data.get("_price")? {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

pub(crate) fn join_url(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint)
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            reqwest::Client::new()
        })
}

pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PaymentError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| PaymentError::InvalidResponse {
            message: e.to_string(),
        })
}
