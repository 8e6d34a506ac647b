//! Server Configuration
//!
//! Layered configuration for the PairAgent server: optional config file,
//! `config/default`, `config/local`, `PAIRAGENT__*` environment variables,
//! then CLI flags (applied in `main`). Conventional variables such as
//! `AGENT_SERVICES_WALLET` fill in whatever is still unset.

use pairagent_llm::LLMSettings;
use pairagent_payments::x402::{DEFAULT_NETWORK, USDC_ASSET};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Receiving wallet used when none is configured
pub const DEFAULT_RECEIVING_WALLET: &str = "0x0000000000000000000000000000000000000000";

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    /// Mock agent behaviour
    #[serde(default)]
    pub agents: AgentSettings,

    /// Device and payee identity
    #[serde(default)]
    pub identity: IdentitySettings,

    /// LLM planning
    #[serde(default)]
    pub llm: LLMSettings,

    /// x402 gate
    #[serde(default)]
    pub payments: PaymentSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Grace period for in-flight requests on shutdown
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}: {}", addr, e))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Sleep for each agent's latency profile before answering
    #[serde(default = "default_true")]
    pub simulate_latency: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            simulate_latency: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentitySettings {
    pub device_id: Option<String>,
    pub erc8004_id: Option<String>,
    /// Wallet that receives agent service payments
    pub receiving_wallet: Option<String>,
}

impl IdentitySettings {
    pub fn pay_to(&self) -> String {
        self.receiving_wallet
            .clone()
            .unwrap_or_else(|| DEFAULT_RECEIVING_WALLET.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettings {
    /// Answer unpaid agent calls with HTTP 402
    #[serde(default)]
    pub require_payment: bool,

    #[serde(default = "default_network")]
    pub network: String,

    #[serde(default = "default_asset")]
    pub asset: String,

    /// Seconds a payment authorization may take
    #[serde(default = "default_max_timeout")]
    pub max_timeout_seconds: u64,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            require_payment: false,
            network: default_network(),
            asset: default_asset(),
            max_timeout_seconds: default_max_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_shutdown_timeout() -> u64 {
    5
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

fn default_asset() -> String {
    USDC_ASSET.to_string()
}

fn default_max_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ServerConfig {
    /// Load configuration from environment and optional config file
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        builder = builder.add_source(
            config::Environment::with_prefix("PAIRAGENT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut server_config: ServerConfig = config.try_deserialize().unwrap_or_else(|e| {
            tracing::warn!("Using default configuration ({})", e);
            ServerConfig::default()
        });
        server_config.apply_env_fallbacks();

        Ok(server_config)
    }

    /// Fill unset identity fields from conventional environment variables
    pub fn apply_env_fallbacks(&mut self) {
        if self.identity.receiving_wallet.is_none() {
            self.identity.receiving_wallet = env_var("AGENT_SERVICES_WALLET");
        }
        if self.identity.device_id.is_none() {
            self.identity.device_id = env_var("PAIRPOINT_DEVICE_ID");
        }
        if self.identity.erc8004_id.is_none() {
            self.identity.erc8004_id = env_var("ERC8004_AGENT_ID");
        }
    }

    /// Configuration for tests: no latency, no LLM, open gate
    pub fn development() -> Self {
        Self {
            agents: AgentSettings {
                simulate_latency: false,
            },
            llm: LLMSettings {
                provider: "disabled".to_string(),
                ..Default::default()
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 3000);
        assert!(config.agents.simulate_latency);
        assert!(!config.payments.require_payment);
        assert_eq!(config.payments.network, "base-sepolia");
        assert_eq!(config.llm.provider, "auto");
        assert_eq!(config.identity.pay_to(), DEFAULT_RECEIVING_WALLET);
    }

    #[test]
    fn test_socket_addr() {
        let mut settings = ServerSettings::default();
        settings.host = "127.0.0.1".to_string();
        settings.port = 8088;
        assert_eq!(settings.socket_addr().unwrap().port(), 8088);

        settings.host = "not a host".to_string();
        assert!(settings.socket_addr().is_err());
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: ServerConfig = serde_json::from_value(serde_json::json!({
            "server": { "port": 4100 },
            "payments": { "require_payment": true }
        }))
        .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.payments.require_payment);
        assert_eq!(config.payments.max_timeout_seconds, 60);
    }

    #[test]
    fn test_development() {
        let config = ServerConfig::development();
        assert!(!config.agents.simulate_latency);
        assert_eq!(config.llm.provider, "disabled");
        assert_eq!(config.logging.level, "debug");
    }
}
