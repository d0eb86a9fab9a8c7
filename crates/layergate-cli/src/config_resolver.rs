//! Locates the `layergate.toml` rules file.
//!
//! Lookup order, first hit wins:
//!
//! 1. `--config <path>` (used as given, even if missing)
//! 2. `layergate.toml`, then `.layergate.toml`, in the project directory
//! 3. `config.toml` in the global directory
//!    (`$LAYERGATE_CONFIG_DIR`, else `~/.layergate/`)
//!
//! Commands that need rules fail when nothing is found.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Where the rules file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Missing,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Missing => None,
        }
    }

    /// Reads the rules file.
    ///
    /// # Errors
    ///
    /// Fails when no file was found or it cannot be read.
    pub fn read(&self) -> Result<String> {
        let Some(path) = self.path() else {
            bail!("No layergate.toml found. Run `layergate init` to create one.");
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))
    }
}

const PROJECT_FILE_NAMES: &[&str] = &["layergate.toml", ".layergate.toml"];

const GLOBAL_FILE_NAME: &str = "config.toml";

/// Resolves the rules file for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with_global(project_dir, explicit, global_config_dir())
}

/// Takes the global directory as a parameter so tests never touch env vars.
fn resolve_with_global(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_FILE_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_FILE_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Missing,
    }
}

/// `$LAYERGATE_CONFIG_DIR`, else `~/.layergate/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("LAYERGATE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".layergate"))
}
