//! List rules command implementation.

use anyhow::{Context, Result};
use layergate_core::declarative::{self, model::RuleConfig};

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let content = source.read()?;
    let configs = declarative::parse_rule_configs(&content).context("Failed to load rules")?;

    if configs.is_empty() {
        println!("No rules configured.");
        return Ok(());
    }

    println!("Configured rules:\n");
    println!("{:<25} {:<8} {:<30} Constraints", "Name", "Kind", "Layer");
    println!("{}", "-".repeat(80));

    for config in &configs {
        println!(
            "{:<25} {:<8} {:<30} {}",
            config.name(),
            config.kind(),
            config.layer().join(", "),
            constraint_kinds(config)
        );
    }

    println!("\nUse --rules to run specific rules, e.g.:");
    println!("  layergate check --components analysis.json --rules {}", configs[0].name());

    Ok(())
}

fn constraint_kinds(config: &RuleConfig) -> String {
    match config {
        RuleConfig::Import(c) => c.constraints().active_kinds().join(", "),
    }
}
