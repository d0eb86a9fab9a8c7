//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# layergate configuration
#
# Each [[rules]] entry governs the files matched by `layer` (a path prefix
# or glob, or an array of them) and constrains what those files import.
# `**` must be a whole path segment: write "src/**/*.ts", not "src/**.ts".

[[rules]]
name = "domain-isolation"
description = "Domain code must not depend on UI or infrastructure"
layer = "src/domain"
must_not_import_from = ["src/ui", "src/infra"]

[[rules]]
name = "api-boundary"
description = "API handlers only reach into domain and shared code"
layer = "src/api"
may_import_from = ["src/domain", "src/shared"]
# severity = "warning"  # error | warning | info (default: error)

# [[rules]]
# name = "services-use-types"
# layer = ["src/services", "src/jobs/**"]
# must_import_from = ["src/types"]
# message = "Services must use the shared type definitions"
# suggestion = "Import request/response types from src/types"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("layergate.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created layergate.toml");
    println!("\nNext steps:");
    println!("  1. Edit layergate.toml to describe your layers");
    println!("  2. Run: layergate check --components analysis.json");

    Ok(())
}
