//! PairAgent CLI - watch an EV hire and pay service agents
//!
//! The terminal stands in for the dashboard: each run asks the orchestrator
//! for a plan, hires the planned agents through x402 payments, and streams
//! the activity log.
//!
//! # Quick Start
//!
//! ```bash
//! # Start the server first (in one terminal)
//! cargo run -p pairagent-server
//!
//! # Then run three autonomous cycles (charge, maintenance, fleet)
//! pairagent run --cycles 3
//!
//! # Inspect a plan without hiring anyone
//! pairagent plan --battery 12 --scenario charge
//! ```

use clap::{Parser, Subcommand};
use colored::*;
use pairagent_payments::PaymentMode;
use pairagent_runner::DEFAULT_SERVER_URL;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::run::RunOptions;

/// PairAgent CLI - autonomous EV agent marketplace
#[derive(Parser, Debug)]
#[command(name = "pairagent")]
#[command(author = "PairAgent Contributors")]
#[command(version)]
#[command(about = "An EV that hires and pays AI service agents per call via x402", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// PairAgent server URL
    #[arg(long, global = true, env = "PAIRAGENT_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run autonomous hire-and-pay sequences
    Run {
        /// Number of sequences; scenarios cycle charge → maintenance → fleet
        #[arg(short, long, default_value = "1")]
        cycles: u32,

        /// simulated or onchain
        #[arg(long, env = "PAIRAGENT_PAYMENT_MODE", default_value = "simulated", value_parser = parse_mode)]
        payment_mode: PaymentMode,

        /// Payer wallet for x402 authorizations (0x + 40 hex)
        #[arg(long, env = "PAIRAGENT_WALLET_ADDRESS")]
        wallet_address: Option<String>,

        /// Plan in this process instead of asking the server
        #[arg(long)]
        local_planning: bool,

        /// Playback speed; 0 runs without delays
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },

    /// Show the plan for a device state
    Plan {
        #[arg(short, long, default_value = "23")]
        battery: f64,

        /// Wallet balance in USDC
        #[arg(short, long, default_value = "1.2847")]
        wallet: f64,

        /// charge, maintenance, or fleet
        #[arg(short, long)]
        scenario: Option<String>,

        /// Plan in this process instead of asking the server
        #[arg(long)]
        local: bool,
    },

    /// List hireable agents
    Agents,

    /// Check the server
    Health,
}

fn parse_mode(s: &str) -> Result<PaymentMode, String> {
    PaymentMode::parse(s).ok_or_else(|| format!("unknown payment mode '{}'", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    print_banner();

    match cli.command {
        Commands::Run {
            cycles,
            payment_mode,
            wallet_address,
            local_planning,
            speed,
        } => {
            commands::run::run(RunOptions {
                server: cli.server,
                cycles,
                payment_mode,
                wallet_address,
                local_planning,
                speed,
            })
            .await
        }
        Commands::Plan {
            battery,
            wallet,
            scenario,
            local,
        } => commands::plan::show_plan(&cli.server, local, battery, wallet, scenario).await,
        Commands::Agents => commands::agents::list_agents(&cli.server).await,
        Commands::Health => commands::agents::health(&cli.server).await,
    }
}

fn print_banner() {
    println!();
    println!("  {} {}", "⚡".bright_yellow(), "PairAgent".bright_white().bold());
    println!("  {}", "Autonomous EV · x402 micropayments · SKALE Base Sepolia".bright_black());
}
