//! x402 payment gate for `/api/agents/*`
//!
//! Pass-through unless `payments.require_payment` is set. When it is, a
//! request must carry an `X-PAYMENT` header that authorizes at least the
//! agent's price to the receiving wallet; otherwise the gate answers 402
//! with the payment requirements. Paid responses get an
//! `X-PAYMENT-RESPONSE` settlement header. Authorizations are checked for
//! shape only; nothing is verified on chain.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use pairagent_payments::generate_tx_hash;
use pairagent_payments::x402::{
    to_atomic, PaymentPayload, PaymentRequired, PaymentRequirements, SettlementResponse,
    PAYMENT_HEADER, PAYMENT_RESPONSE_HEADER, SCHEME_EXACT, X402_VERSION,
};
use pairagent_types::AgentConfig;
use std::sync::Arc;

use crate::state::AppState;

pub async fn x402_gate(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    if !state.payments.require_payment {
        return next.run(req).await;
    }

    let Some(agent) = state.registry.by_endpoint(req.uri().path()).cloned() else {
        return next.run(req).await;
    };
    let requirements = requirements_for(&state, &agent);

    let header = req
        .headers()
        .get(PAYMENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let Some(header) = header else {
        tracing::debug!(agent_id = %agent.id, "Unpaid agent call, answering 402");
        return payment_required(requirements, "X-PAYMENT header is required");
    };

    let payload = match PaymentPayload::decode(&header) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(agent_id = %agent.id, "Rejected payment header: {}", e);
            return payment_required(requirements, &e.to_string());
        }
    };

    if let Err(reason) = verify(&payload, &requirements) {
        tracing::warn!(agent_id = %agent.id, payer = %payload.authorization.from, "Payment rejected: {}", reason);
        return payment_required(requirements, &reason);
    }

    let mut response = next.run(req).await;
    if response.status().is_success() {
        let settlement = SettlementResponse {
            success: true,
            tx_hash: generate_tx_hash(),
            network: requirements.network.clone(),
            payer: Some(payload.authorization.from.clone()),
        };
        tracing::info!(
            agent_id = %agent.id,
            payer = %payload.authorization.from,
            amount = %agent.price_per_call,
            tx_hash = %settlement.tx_hash,
            "x402 payment accepted"
        );
        match settlement
            .to_header()
            .ok()
            .and_then(|v| HeaderValue::from_str(&v).ok())
        {
            Some(value) => {
                response.headers_mut().insert(PAYMENT_RESPONSE_HEADER, value);
            }
            None => tracing::warn!("Could not encode settlement header"),
        }
    }
    response
}

fn requirements_for(state: &AppState, agent: &AgentConfig) -> PaymentRequirements {
    PaymentRequirements {
        scheme: SCHEME_EXACT.to_string(),
        network: state.payments.network.clone(),
        max_amount_required: to_atomic(agent.price_per_call),
        resource: agent.endpoint.clone(),
        description: format!("{} - {}", agent.name, agent.description),
        pay_to: state.pay_to.clone(),
        asset: state.payments.asset.clone(),
        max_timeout_seconds: state.payments.max_timeout_seconds,
    }
}

fn verify(payload: &PaymentPayload, requirements: &PaymentRequirements) -> Result<(), String> {
    if payload.scheme != requirements.scheme {
        return Err(format!("unsupported scheme '{}'", payload.scheme));
    }
    if payload.network != requirements.network {
        return Err(format!("wrong network '{}'", payload.network));
    }
    if !payload
        .authorization
        .to
        .eq_ignore_ascii_case(&requirements.pay_to)
    {
        return Err("payment addressed to the wrong wallet".to_string());
    }

    let paid: u128 = payload.authorization.value.parse().unwrap_or(0);
    let required: u128 = requirements.max_amount_required.parse().unwrap_or(u128::MAX);
    if paid < required {
        return Err(format!(
            "insufficient amount: {} < {}",
            payload.authorization.value, requirements.max_amount_required
        ));
    }

    if payload.authorization.valid_before < Utc::now().timestamp() {
        return Err("authorization expired".to_string());
    }
    Ok(())
}

fn payment_required(requirements: PaymentRequirements, error: &str) -> Response {
    let body = PaymentRequired {
        x402_version: X402_VERSION,
        error: error.to_string(),
        accepts: vec![requirements],
    };
    (StatusCode::PAYMENT_REQUIRED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairagent_payments::x402::{DEFAULT_NETWORK, USDC_ASSET};

    fn requirements() -> PaymentRequirements {
        PaymentRequirements {
            scheme: SCHEME_EXACT.to_string(),
            network: DEFAULT_NETWORK.to_string(),
            max_amount_required: "5000".to_string(),
            resource: "/api/agents/routing".to_string(),
            description: String::new(),
            pay_to: "0x000000000000000000000000000000000000dEaD".to_string(),
            asset: USDC_ASSET.to_string(),
            max_timeout_seconds: 60,
        }
    }

    #[test]
    fn test_verify_accepts_matching_authorization() {
        let req = requirements();
        let payload = PaymentPayload::authorize("0xabc", &req);
        assert!(verify(&payload, &req).is_ok());
    }

    #[test]
    fn test_verify_rejects_mismatches() {
        let req = requirements();

        let mut underpaid = PaymentPayload::authorize("0xabc", &req);
        underpaid.authorization.value = "4999".to_string();
        assert!(verify(&underpaid, &req).unwrap_err().contains("insufficient"));

        let mut elsewhere = PaymentPayload::authorize("0xabc", &req);
        elsewhere.authorization.to = "0x1111111111111111111111111111111111111111".to_string();
        assert!(verify(&elsewhere, &req).is_err());

        let mut expired = PaymentPayload::authorize("0xabc", &req);
        expired.authorization.valid_before = 0;
        assert_eq!(verify(&expired, &req).unwrap_err(), "authorization expired");

        let mut wrong_net = PaymentPayload::authorize("0xabc", &req);
        wrong_net.network = "mainnet".to_string();
        assert!(verify(&wrong_net, &req).is_err());
    }
}
