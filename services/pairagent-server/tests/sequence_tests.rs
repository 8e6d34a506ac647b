//! Runner against a live server bound to an ephemeral port

use pairagent_payments::{OnChainExecutor, PaymentExecutor, SimulatedExecutor, WalletAddress};
use pairagent_registry::{AgentRegistry, DeviceProfile};
use pairagent_runner::{Pacing, PairAgentClient, SequenceRunner};
use pairagent_server::config::PaymentSettings;
use pairagent_server::{create_router, AppState};
use pairagent_types::{AgentStatus, LogKind, PlanningMethod, Scenario};
use rust_decimal_macros::dec;
use std::sync::Arc;

const PAYER: &str = "0xabababababababababababababababababababab";

async fn spawn(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(Arc::new(state));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn state() -> AppState {
    AppState::new(Arc::new(AgentRegistry::default_fleet()), DeviceProfile::default())
        .with_latency(false)
}

#[tokio::test]
async fn test_simulated_sequence_over_http() {
    let base_url = spawn(state()).await;
    let registry = Arc::new(AgentRegistry::default_fleet());
    let runner = SequenceRunner::new(
        registry,
        Arc::new(SimulatedExecutor::new(base_url.clone())),
        Arc::new(PairAgentClient::new(&base_url)),
    )
    .with_pacing(Pacing::instant());

    let summary = runner.run_sequence().await.unwrap();
    let state = runner.snapshot().await;

    assert_eq!(summary.scenario, Scenario::Charge);
    assert_eq!(summary.planning_method, Some(PlanningMethod::RuleBased));
    assert_eq!(summary.steps_executed, 4);
    assert_eq!(summary.failed_calls, 0);
    assert_eq!(state.total_spent, dec!(0.011));
    assert_eq!(
        state.log.iter().filter(|e| e.kind == LogKind::Payment).count(),
        4
    );
    assert!(state.agents.values().all(|a| a.status == AgentStatus::Idle));
    assert!(state
        .log
        .iter()
        .any(|e| e.kind == LogKind::Result && e.agent_id.as_deref() == Some("slot-agent")
            && e.message.contains("secured")));
}

#[tokio::test]
async fn test_on_chain_executor_against_gate() {
    let payments = PaymentSettings {
        require_payment: true,
        ..Default::default()
    };
    let base_url = spawn(state().with_payments(payments, "0x000000000000000000000000000000000000dEaD")).await;

    let registry = AgentRegistry::default_fleet();
    let executor = OnChainExecutor::new(base_url, WalletAddress::parse(PAYER).unwrap());

    let call = executor
        .execute(registry.get("routing-agent").unwrap(), &serde_json::json!({"batteryLevel": 30}))
        .await
        .unwrap();

    assert!(call.receipt.settled);
    assert_eq!(call.receipt.tx_hash.len(), 66);
    assert_eq!(call.receipt.amount, dec!(0.005));
    assert_eq!(call.data["agentId"], "routing-agent");
}

#[tokio::test]
async fn test_simulated_executor_is_refused_by_gate() {
    let payments = PaymentSettings {
        require_payment: true,
        ..Default::default()
    };
    let base_url = spawn(state().with_payments(payments, "0x000000000000000000000000000000000000dEaD")).await;
    let registry = Arc::new(AgentRegistry::default_fleet());
    let runner = SequenceRunner::new(
        registry,
        Arc::new(SimulatedExecutor::new(base_url.clone())),
        Arc::new(PairAgentClient::new(&base_url)),
    )
    .with_pacing(Pacing::instant());

    let summary = runner.run_sequence().await.unwrap();
    let state = runner.snapshot().await;

    // Every call fails with 402, is replaced by the fallback, and is still booked
    assert_eq!(summary.failed_calls, 4);
    assert_eq!(state.total_transactions, 4);
    assert_eq!(
        state.log.iter().filter(|e| e.kind == LogKind::Error).count(),
        4
    );
}
