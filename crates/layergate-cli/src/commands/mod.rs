//! Subcommand implementations.

pub mod check;
pub mod cycles;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use layergate_core::ComponentGraph;
use std::path::Path;

/// Loads analyzer output into a graph.
pub fn load_graph(path: &Path) -> Result<ComponentGraph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read components: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    let graph = ComponentGraph::from_json(value)
        .with_context(|| format!("Failed to build graph from {}", path.display()))?;
    tracing::debug!("Loaded {} component(s) from {}", graph.len(), path.display());
    Ok(graph)
}
