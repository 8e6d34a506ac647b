//! `pairagent run` - the autonomous sequence, live

use std::sync::Arc;
use std::time::Duration;

use colored::*;
use pairagent_llm::LLMRouter;
use pairagent_orchestrator::PlanResolver;
use pairagent_payments::{
    OnChainExecutor, PaymentExecutor, PaymentMode, SimulatedExecutor, WalletConnector,
};
use pairagent_registry::AgentRegistry;
use pairagent_runner::{
    DashboardEvent, DashboardState, Pacing, PairAgentClient, PlanSource, SequenceRunner,
};
use pairagent_types::format_usdc;
use tokio::sync::broadcast::error::RecvError;

use crate::display;

pub struct RunOptions {
    pub server: String,
    pub cycles: u32,
    pub payment_mode: PaymentMode,
    pub wallet_address: Option<String>,
    /// Plan in-process instead of calling `/api/orchestrate`
    pub local_planning: bool,
    /// Delay multiplier; 0 disables pacing
    pub speed: f64,
}

pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let client = PairAgentClient::new(&opts.server);
    if !client.is_available().await {
        display::error(&format!("No PairAgent server at {}", opts.server));
        display::info("Start one with: pairagent-server");
        anyhow::bail!("server unavailable");
    }

    let registry = Arc::new(AgentRegistry::global().clone());
    let connector = WalletConnector::new(opts.wallet_address.clone());

    let executor: Arc<dyn PaymentExecutor> = match opts.payment_mode {
        PaymentMode::OnChain => match connector.connect() {
            Ok(wallet) => Arc::new(OnChainExecutor::new(&opts.server, wallet)),
            Err(_) => Arc::new(SimulatedExecutor::new(&opts.server)),
        },
        PaymentMode::Simulated => Arc::new(SimulatedExecutor::new(&opts.server)),
    };

    let plan_source: Arc<dyn PlanSource> = if opts.local_planning {
        Arc::new(PlanResolver::from_llm(LLMRouter::from_env(), registry.clone()))
    } else {
        Arc::new(client)
    };

    let pacing = if opts.speed <= 0.0 {
        Pacing::instant()
    } else {
        Pacing::default().scaled(1.0 / opts.speed)
    };

    let runner = Arc::new(
        SequenceRunner::new(registry.clone(), executor, plan_source).with_pacing(pacing),
    );
    let printer = tokio::spawn(print_events(runner.subscribe()));

    if opts.wallet_address.is_some() || opts.payment_mode.is_on_chain() {
        runner.connect_wallet(&connector).await;
    }

    let initial = runner.snapshot().await;
    print_dashboard("PairAgent EV", &initial);

    for cycle in 1..=opts.cycles.max(1) {
        let scenario = runner.snapshot().await.next_scenario();
        display::section(&format!(
            "Cycle {}/{} · scenario: {}",
            cycle,
            opts.cycles.max(1),
            scenario
        ));

        let summary = runner.run_sequence().await?;
        // Let the printer drain before the summary
        tokio::time::sleep(Duration::from_millis(50)).await;

        println!();
        display::kv("Agents hired", &summary.steps_executed.to_string());
        display::kv("Spent", &format!("{} USDC", format_usdc(summary.spent)));
        if let Some(method) = summary.planning_method {
            display::kv("Planning", &method.to_string());
        }
        if summary.failed_calls > 0 {
            display::warning(&format!("{} agent call(s) used fallback responses", summary.failed_calls));
        }
    }

    let state = runner.snapshot().await;
    drop(runner);
    let _ = printer.await;

    print_dashboard("Session totals", &state);
    Ok(())
}

async fn print_events(mut rx: tokio::sync::broadcast::Receiver<DashboardEvent>) {
    loop {
        match rx.recv().await {
            Ok(DashboardEvent::LogAppended { entry }) => display::log_entry(&entry),
            Ok(DashboardEvent::BatteryChanged { level }) => {
                println!("  🔋 {}", display::battery_bar(level));
            }
            Ok(_) => {}
            Err(RecvError::Lagged(missed)) => {
                display::warning(&format!("{} dashboard events skipped", missed));
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_dashboard(title: &str, state: &DashboardState) {
    display::section(title);
    display::kv("Battery", &display::battery_bar(state.battery));
    display::kv("Wallet", &format!("{} USDC", format_usdc(state.wallet_balance)));
    display::kv("Total spent", &format!("{} USDC", format_usdc(state.total_spent)));
    display::kv("Transactions", &state.total_transactions.to_string());
    display::kv("Payment mode", &state.payment_mode.to_string());
    if let Some(address) = &state.wallet_address {
        display::kv("Wallet address", address);
    }
    println!();
    for (id, agent) in &state.agents {
        println!(
            "      {} {} calls · {}",
            format!("{:<14}", id).bright_cyan(),
            agent.calls,
            agent.status
        );
    }
}
