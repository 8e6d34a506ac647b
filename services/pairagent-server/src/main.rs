//! PairAgent Server
//!
//! Hosts the four mock service agents, the orchestrator, and the registry.
//!
//! ```bash
//! # Defaults: 0.0.0.0:3000, rule-based planning unless an LLM key is set
//! pairagent-server
//!
//! # Require x402 payment headers on agent calls
//! pairagent-server --require-payment
//!
//! # Environment overrides
//! PAIRAGENT__SERVER__PORT=8080 PAIRAGENT__LLM__PROVIDER=disabled pairagent-server
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pairagent_server::config::LoggingConfig;
use pairagent_server::{create_router, AppState, ServerConfig};

/// PairAgent Server - autonomous EV agent marketplace
#[derive(Parser, Debug)]
#[command(name = "pairagent-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "PAIRAGENT_CONFIG")]
    config: Option<String>,

    #[arg(long, env = "PAIRAGENT_HOST")]
    host: Option<String>,

    #[arg(short, long, env = "PAIRAGENT_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PAIRAGENT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "PAIRAGENT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Answer agent calls without artificial latency
    #[arg(long)]
    no_latency: bool,

    /// Require x402 payment headers on agent calls
    #[arg(long, env = "PAIRAGENT_REQUIRE_PAYMENT")]
    require_payment: bool,

    /// LLM provider: auto, openai, openai_compat, anthropic, disabled
    #[arg(long, env = "PAIRAGENT_LLM_PROVIDER")]
    llm_provider: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(level) = args.log_level {
        server_config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        server_config.logging.format = format;
    }
    if args.no_latency {
        server_config.agents.simulate_latency = false;
    }
    if args.require_payment {
        server_config.payments.require_payment = true;
    }
    if let Some(provider) = args.llm_provider {
        server_config.llm.provider = provider;
    }

    init_logging(&server_config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting PairAgent Server"
    );

    let state = Arc::new(AppState::from_config(&server_config));
    tracing::info!(
        agents = state.registry.len(),
        device_id = %state.device().device_id,
        simulate_latency = state.simulate_latency,
        require_payment = state.payments.require_payment,
        "Application state ready"
    );

    let app = create_router(state);
    let addr = server_config.server.socket_addr()?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    tracing::info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
    tokio::time::sleep(grace).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["pairagent-server", "--port", "8080", "--no-latency"]);
        assert_eq!(args.port, Some(8080));
        assert!(args.no_latency);
        assert!(args.config.is_none());
    }
}
