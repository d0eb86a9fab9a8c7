//! Check command implementation.

use anyhow::{Context, Result};
use layergate_core::{declarative, PatternOptions, RuleBox, RuleEngine};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    components: &Path,
    format: OutputFormat,
    rules_filter: Option<&str>,
    options: PatternOptions,
    source: &ConfigSource,
) -> Result<()> {
    let content = source.read()?;
    let mut rules =
        declarative::load_rules_from_toml(&content).context("Failed to load rules")?;

    if let Some(filter) = rules_filter {
        let names: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        rules = filter_rules(rules, &names);
    }

    let graph = super::load_graph(components)?;

    tracing::info!(
        "Checking {} component(s) with {} rule(s)",
        graph.len(),
        rules.len()
    );

    let results = RuleEngine::with_pattern_options(options).validate(&rules, &graph);

    super::output::print(&results, format)?;

    // Exit with error code if there are errors
    if results.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Keeps rules whose name is listed, in config order.
fn filter_rules(rules: Vec<RuleBox>, names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        if !rules.iter().any(|r| r.name() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }
    rules
        .into_iter()
        .filter(|r| names.contains(&r.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"
[[rules]]
name = "domain-isolation"
layer = "src/domain"
must_not_import_from = ["src/ui"]

[[rules]]
name = "api-boundary"
layer = "src/api"
may_import_from = ["src/domain"]
"#;

    #[test]
    fn filter_keeps_named_rules_in_config_order() {
        let rules = declarative::load_rules_from_toml(RULES).unwrap();
        let kept = filter_rules(rules, &["api-boundary", "domain-isolation"]);
        let names: Vec<&str> = kept.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["domain-isolation", "api-boundary"]);
    }

    #[test]
    fn filter_drops_unknown_names() {
        let rules = declarative::load_rules_from_toml(RULES).unwrap();
        let kept = filter_rules(rules, &["nope"]);
        assert!(kept.is_empty());
    }
}
