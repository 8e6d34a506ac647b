//! Display utilities for the CLI

use colored::*;
use pairagent_payments::short_hash;
use pairagent_types::{format_usdc, AgentConfig, LogEntry, LogKind, OrchestratorPlan};

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

pub fn error(message: &str) {
    println!("  {} {}", "✗".bright_red(), message.bright_red());
}

pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// One dashboard log line
pub fn log_entry(entry: &LogEntry) {
    let time = entry.timestamp.format("%H:%M:%S").to_string().bright_black();
    let agent = entry
        .agent_id
        .as_deref()
        .map(|id| format!("[{}] ", id).bright_magenta().to_string())
        .unwrap_or_default();
    let message = match entry.kind {
        LogKind::System => entry.message.bright_white(),
        LogKind::Action => entry.message.bright_blue(),
        LogKind::Payment => entry.message.bright_yellow(),
        LogKind::Result => entry.message.bright_green(),
        LogKind::Error => entry.message.bright_red(),
    };

    println!("  {} {} {}{}", time, entry.icon, agent, message);
    if let Some(tx) = &entry.tx_hash {
        println!("             {} {}", "tx".bright_black(), short_hash(tx).bright_black());
    }
}

/// `[██████░░░░] 62%`
pub fn battery_bar(level: f64) -> String {
    let level = level.clamp(0.0, 100.0);
    let filled = (level / 10.0).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled));
    let bar = if level <= 20.0 {
        bar.bright_red()
    } else if level <= 50.0 {
        bar.yellow()
    } else {
        bar.bright_green()
    };
    format!("[{}] {:.0}%", bar, level)
}

pub fn plan(plan: &OrchestratorPlan) {
    println!("  🚨 {}", plan.trigger.bright_white().bold());
    println!("  {}", plan.reasoning.bright_black());
    println!();
    for (i, step) in plan.steps.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            step.agent_name.bright_cyan(),
            format!("({})", step.agent_id).bright_black()
        );
        println!("     {}", step.action);
        if !step.params.is_empty() {
            println!(
                "     {}",
                serde_json::Value::Object(step.params.clone()).to_string().bright_black()
            );
        }
    }
    println!();
    kv("Estimated cost", &plan.estimated_cost);
    kv("Estimated time", &plan.estimated_time);
}

pub fn agent(agent: &AgentConfig) {
    println!(
        "  {} {} {} {}",
        agent.icon,
        agent.name.bright_white().bold(),
        format!("({})", agent.id).bright_black(),
        format!("{}/call", format_usdc(agent.price_per_call)).bright_yellow()
    );
    println!("     {} · {} · ★ {:.1}", agent.category, agent.latency, agent.reputation);
    println!("     {}", agent.description.bright_black());
    println!("     {}", agent.endpoint.bright_blue());
}
