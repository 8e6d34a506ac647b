//! x402 payment executor
//!
//! Speaks the 402 challenge/retry protocol. Authorizations are not signed
//! and nothing settles on chain; the transaction hash comes from the
//! agent's settlement header when it sends one.

use async_trait::async_trait;
use chrono::Utc;
use pairagent_types::AgentConfig;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::x402::{PaymentPayload, PaymentRequired, SettlementResponse, PAYMENT_HEADER, PAYMENT_RESPONSE_HEADER};
use crate::{
    declared_price, generate_tx_hash, http_client, join_url, read_json, PaidCall, PaymentError,
    PaymentExecutor, PaymentMode, PaymentReceipt, Result, WalletAddress,
};

pub const ONCHAIN_NETWORK: &str = "Base Sepolia";

/// Pays for agent calls through x402 headers on behalf of a connected wallet
#[derive(Debug, Clone)]
pub struct OnChainExecutor {
    base_url: String,
    wallet: WalletAddress,
    client: reqwest::Client,
}

impl OnChainExecutor {
    pub fn new(base_url: impl Into<String>, wallet: WalletAddress) -> Self {
        Self::with_timeout(base_url, wallet, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: impl Into<String>, wallet: WalletAddress, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            wallet,
            client: http_client(timeout),
        }
    }

    pub fn wallet(&self) -> &WalletAddress {
        &self.wallet
    }

    async fn answer_challenge(&self, response: reqwest::Response) -> Result<(String, PaymentPayload)> {
        let challenge: PaymentRequired =
            response.json().await.map_err(|e| PaymentError::InvalidResponse {
                message: format!("unreadable 402 body: {}", e),
            })?;

        let requirements = challenge
            .accepts
            .first()
            .ok_or_else(|| PaymentError::PaymentRejected {
                message: "402 response offered no payment options".to_string(),
            })?;

        let payload = PaymentPayload::authorize(self.wallet.as_str(), requirements);
        Ok((payload.encode()?, payload))
    }
}

#[async_trait]
impl PaymentExecutor for OnChainExecutor {
    fn mode(&self) -> PaymentMode {
        PaymentMode::OnChain
    }

    async fn execute(&self, agent: &AgentConfig, params: &Value) -> Result<PaidCall> {
        let started = Instant::now();
        let url = join_url(&self.base_url, &agent.endpoint);

        let mut response = self.client.post(&url).json(params).send().await?;
        let mut authorized = None;

        if response.status() == StatusCode::PAYMENT_REQUIRED {
            let (header, payload) = self.answer_challenge(response).await?;
            tracing::info!(
                agent = %agent.id,
                to = %payload.authorization.to,
                value = %payload.authorization.value,
                "Answering x402 challenge"
            );

            response = self
                .client
                .post(&url)
                .header(PAYMENT_HEADER, header)
                .json(params)
                .send()
                .await?;

            if response.status() == StatusCode::PAYMENT_REQUIRED {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(agent = %agent.id, "Payment not accepted after retry");
                return Err(PaymentError::PaymentRejected { message: body });
            }
            authorized = payload.amount();
        }

        let settlement = response
            .headers()
            .get(PAYMENT_RESPONSE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(SettlementResponse::from_header);

        let data = read_json(response).await?;

        let amount = authorized
            .or_else(|| declared_price(&data))
            .unwrap_or(agent.price_per_call);

        let receipt = match settlement {
            Some(s) => PaymentReceipt {
                success: s.success,
                tx_hash: s.tx_hash,
                amount,
                network: ONCHAIN_NETWORK.to_string(),
                settled: true,
                timestamp: Utc::now(),
            },
            None => PaymentReceipt {
                success: true,
                tx_hash: generate_tx_hash(),
                amount,
                network: ONCHAIN_NETWORK.to_string(),
                settled: false,
                timestamp: Utc::now(),
            },
        };

        Ok(PaidCall {
            data,
            receipt,
            latency: started.elapsed(),
        })
    }
}
