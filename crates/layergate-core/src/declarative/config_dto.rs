//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of the rule file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfigDto {
    /// Rule definitions, in file order.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// A layer given either as one pattern or as a list of patterns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayerDto {
    /// `layer = "src/domain"`
    One(String),
    /// `layer = ["src/domain", "src/core"]`
    Many(Vec<String>),
}

impl LayerDto {
    /// Flattens into a pattern list.
    #[must_use]
    pub fn into_patterns(self) -> Vec<String> {
        match self {
            Self::One(p) => vec![p],
            Self::Many(ps) => ps,
        }
    }
}

/// TOML representation of one `[[rules]]` entry.
///
/// The rule kind is inferred from which constraint keys are present.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDto {
    /// Rule name (e.g., "domain-isolation").
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Layer pattern(s).
    pub layer: LayerDto,
    /// Forbidden import patterns.
    #[serde(default)]
    pub must_not_import_from: Option<Vec<String>>,
    /// Allowed import patterns.
    #[serde(default)]
    pub may_import_from: Option<Vec<String>>,
    /// Required import patterns.
    #[serde(default)]
    pub must_import_from: Option<Vec<String>>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Violation message override.
    #[serde(default)]
    pub message: Option<String>,
    /// Suggestion attached to violations.
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl RuleDto {
    /// Returns `true` if any import constraint key is present.
    #[must_use]
    pub fn has_import_constraints(&self) -> bool {
        self.must_not_import_from.is_some()
            || self.may_import_from.is_some()
            || self.must_import_from.is_some()
    }
}

fn default_severity_str() -> String {
    "error".to_string()
}
