//! x402 wire format
//!
//! A gated endpoint answers an unpaid request with HTTP 402 and a
//! [`PaymentRequired`] body. The client retries with an `X-PAYMENT` header
//! carrying a base64-encoded [`PaymentPayload`]; the server answers with an
//! `X-PAYMENT-RESPONSE` header describing the settlement.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use rand::RngCore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{PaymentError, Result};

pub const X402_VERSION: u32 = 1;
pub const PAYMENT_HEADER: &str = "x-payment";
pub const PAYMENT_RESPONSE_HEADER: &str = "x-payment-response";
pub const SCHEME_EXACT: &str = "exact";
pub const DEFAULT_NETWORK: &str = "base-sepolia";
/// USDC on SKALE Base Sepolia
pub const USDC_ASSET: &str = "0x2e08028E3C4c2356572E096d8EF835cD5C6030bD";
pub const USDC_DECIMALS: u32 = 6;
/// Seconds an authorization stays valid
pub const AUTHORIZATION_WINDOW_SECS: i64 = 300;

/// Convert a USDC amount into atomic units, e.g. 0.002 -> "2000"
pub fn to_atomic(amount: Decimal) -> String {
    (amount * Decimal::from(10u64.pow(USDC_DECIMALS)))
        .trunc()
        .to_string()
}

/// Convert atomic units back into a USDC amount
pub fn from_atomic(atomic: &str) -> Option<Decimal> {
    let units = Decimal::from_str(atomic.trim()).ok()?;
    Some((units / Decimal::from(10u64.pow(USDC_DECIMALS))).normalize())
}

/// One acceptable way to pay for a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub scheme: String,
    pub network: String,
    /// Price in atomic USDC units
    pub max_amount_required: String,
    pub resource: String,
    #[serde(default)]
    pub description: String,
    pub pay_to: String,
    pub asset: String,
    #[serde(default)]
    pub max_timeout_seconds: u64,
}

/// Body of an HTTP 402 response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    pub x402_version: u32,
    pub error: String,
    pub accepts: Vec<PaymentRequirements>,
}

/// Transfer authorization details (unsigned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub from: String,
    pub to: String,
    pub value: String,
    pub valid_after: i64,
    pub valid_before: i64,
    pub nonce: String,
}

/// Decoded `X-PAYMENT` header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
    pub asset: String,
    pub authorization: Authorization,
}

impl PaymentPayload {
    /// Authorize `payer` to pay what `requirements` ask for
    pub fn authorize(payer: &str, requirements: &PaymentRequirements) -> Self {
        let now = Utc::now().timestamp();
        let mut nonce = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce);

        Self {
            x402_version: X402_VERSION,
            scheme: requirements.scheme.clone(),
            network: requirements.network.clone(),
            asset: requirements.asset.clone(),
            authorization: Authorization {
                from: payer.to_string(),
                to: requirements.pay_to.clone(),
                value: requirements.max_amount_required.clone(),
                valid_after: now,
                valid_before: now + AUTHORIZATION_WINDOW_SECS,
                nonce: format!("0x{}", hex::encode(nonce)),
            },
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        from_atomic(&self.authorization.value)
    }

    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self).map_err(|e| PaymentError::MalformedHeader {
            message: e.to_string(),
        })?;
        Ok(BASE64.encode(json))
    }

    pub fn decode(header: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(header.trim())
            .map_err(|e| PaymentError::MalformedHeader {
                message: e.to_string(),
            })?;
        serde_json::from_slice(&bytes).map_err(|e| PaymentError::MalformedHeader {
            message: e.to_string(),
        })
    }
}

/// Settlement summary sent back in `X-PAYMENT-RESPONSE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub success: bool,
    pub tx_hash: String,
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

impl SettlementResponse {
    /// Header value: plain JSON
    pub fn to_header(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PaymentError::MalformedHeader {
            message: e.to_string(),
        })
    }

    /// Accepts plain JSON or base64-encoded JSON
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(parsed) = serde_json::from_str(value) {
            return Some(parsed);
        }
        let bytes = BASE64.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn requirements() -> PaymentRequirements {
        PaymentRequirements {
            scheme: SCHEME_EXACT.to_string(),
            network: DEFAULT_NETWORK.to_string(),
            max_amount_required: to_atomic(dec!(0.005)),
            resource: "/api/agents/routing".to_string(),
            description: "PathFinder".to_string(),
            pay_to: "0x000000000000000000000000000000000000dEaD".to_string(),
            asset: USDC_ASSET.to_string(),
            max_timeout_seconds: 60,
        }
    }

    #[test]
    fn test_atomic_units() {
        assert_eq!(to_atomic(dec!(0.002)), "2000");
        assert_eq!(to_atomic(dec!(0.005)), "5000");
        assert_eq!(from_atomic("3000"), Some(dec!(0.003)));
        assert_eq!(from_atomic("abc"), None);
    }

    #[test]
    fn test_authorization_targets_pay_to() {
        let payload = PaymentPayload::authorize("0xpayer", &requirements());

        assert_eq!(payload.authorization.to, "0x000000000000000000000000000000000000dEaD");
        assert_eq!(payload.amount(), Some(dec!(0.005)));
        assert_eq!(payload.authorization.nonce.len(), 66);
        assert!(payload.authorization.valid_before > payload.authorization.valid_after);

        let header = payload.encode().unwrap();
        assert_eq!(PaymentPayload::decode(&header).unwrap(), payload);
    }

    #[test]
    fn test_decode_garbage_header() {
        assert!(matches!(
            PaymentPayload::decode("%%%"),
            Err(PaymentError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_settlement_header_formats() {
        let settlement = SettlementResponse {
            success: true,
            tx_hash: "0xabc".to_string(),
            network: DEFAULT_NETWORK.to_string(),
            payer: None,
        };
        let plain = settlement.to_header().unwrap();
        assert_eq!(SettlementResponse::from_header(&plain), Some(settlement.clone()));

        let encoded = BASE64.encode(plain.as_bytes());
        assert_eq!(SettlementResponse::from_header(&encoded), Some(settlement));
        assert_eq!(SettlementResponse::from_header("nope"), None);
    }
}
