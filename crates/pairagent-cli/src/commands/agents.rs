//! `pairagent agents` and `pairagent health`

use colored::*;
use pairagent_registry::{AgentRegistry, DeviceProfile, RegistryListing};
use pairagent_runner::PairAgentClient;

use crate::display;

/// List the agent catalog, from the server when reachable
pub async fn list_agents(server: &str) -> anyhow::Result<()> {
    let client = PairAgentClient::new(server);
    let listing = match client.registry().await {
        Ok(listing) => listing,
        Err(e) => {
            display::warning(&format!("{}; showing the built-in catalog", e));
            RegistryListing::new(AgentRegistry::global(), DeviceProfile::default())
        }
    };

    display::section(&format!("Agent Registry ({} agents)", listing.total));
    display::kv("Device", &format!("{} {}", listing.device.model, listing.device.device_id));
    display::kv("ERC-8004 id", &listing.device.erc8004_id);
    display::kv("Network", &listing.device.network);
    println!();
    for agent in &listing.agents {
        display::agent(agent);
        println!();
    }
    Ok(())
}

pub async fn health(server: &str) -> anyhow::Result<()> {
    let client = PairAgentClient::new(server);
    match client.health().await {
        Ok(body) => {
            display::success(&format!("{} is {}", server, body["status"].as_str().unwrap_or("up")));
            for key in ["version", "agents", "llmPlanning", "paymentRequired"] {
                if let Some(value) = body.get(key) {
                    display::kv(key, &value.to_string());
                }
            }
            Ok(())
        }
        Err(e) => {
            display::error(&e.to_string());
            println!("  {}", "Start the server with: pairagent-server".bright_black());
            anyhow::bail!("server unavailable")
        }
    }
}
