//! Simulated payment executor

use async_trait::async_trait;
use chrono::Utc;
use pairagent_types::AgentConfig;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::{
    declared_price, generate_tx_hash, http_client, join_url, read_json, PaidCall, PaymentExecutor,
    PaymentMode, PaymentReceipt, Result,
};

pub const SIMULATED_NETWORK: &str = "Base Sepolia (simulated)";

/// Calls agents without paying; the receipt carries a fabricated hash
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    base_url: String,
    client: reqwest::Client,
}

impl SimulatedExecutor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            client: http_client(timeout),
        }
    }
}

#[async_trait]
impl PaymentExecutor for SimulatedExecutor {
    fn mode(&self) -> PaymentMode {
        PaymentMode::Simulated
    }

    async fn execute(&self, agent: &AgentConfig, params: &Value) -> Result<PaidCall> {
        let started = Instant::now();

        let mut body = match params {
            Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        body.insert("_simulate".to_string(), Value::Bool(true));

        let url = join_url(&self.base_url, &agent.endpoint);
        tracing::debug!(agent = %agent.id, %url, "Simulated agent call");

        let response = self.client.post(&url).json(&body).send().await?;
        let data = read_json(response).await?;

        let amount = declared_price(&data).unwrap_or(agent.price_per_call);

        Ok(PaidCall {
            receipt: PaymentReceipt {
                success: true,
                tx_hash: generate_tx_hash(),
                amount,
                network: SIMULATED_NETWORK.to_string(),
                settled: false,
                timestamp: Utc::now(),
            },
            data,
            latency: started.elapsed(),
        })
    }
}
