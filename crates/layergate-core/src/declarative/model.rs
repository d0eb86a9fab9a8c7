//! Pure domain model for declarative layer rules.
//!
//! This module contains no serde and no I/O. Values are validated at
//! construction and immutable afterwards: fields are private and only
//! exposed through getters.

use crate::types::Severity;

// ────────────────────────────────────────────
// Constraints
// ────────────────────────────────────────────

/// The three import constraint lists of an import rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportConstraints {
    must_not_import_from: Vec<String>,
    may_import_from: Vec<String>,
    must_import_from: Vec<String>,
}

impl ImportConstraints {
    /// Creates a constraint set.
    #[must_use]
    pub fn new(
        must_not_import_from: Vec<String>,
        may_import_from: Vec<String>,
        must_import_from: Vec<String>,
    ) -> Self {
        Self {
            must_not_import_from,
            may_import_from,
            must_import_from,
        }
    }

    /// Forbidden import patterns (blacklist).
    #[must_use]
    pub fn must_not_import_from(&self) -> &[String] {
        &self.must_not_import_from
    }

    /// Allowed import patterns (whitelist; inactive when empty).
    #[must_use]
    pub fn may_import_from(&self) -> &[String] {
        &self.may_import_from
    }

    /// Required import patterns (inactive when empty).
    #[must_use]
    pub fn must_import_from(&self) -> &[String] {
        &self.must_import_from
    }

    /// Names of the non-empty constraint kinds, in check order.
    #[must_use]
    pub fn active_kinds(&self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        if !self.must_not_import_from.is_empty() {
            kinds.push("must_not_import_from");
        }
        if !self.may_import_from.is_empty() {
            kinds.push("may_import_from");
        }
        if !self.must_import_from.is_empty() {
            kinds.push("must_import_from");
        }
        kinds
    }
}

// ────────────────────────────────────────────
// Rule configs
// ────────────────────────────────────────────

/// Configuration of an import rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRuleConfig {
    name: String,
    description: String,
    layer: Vec<String>,
    constraints: ImportConstraints,
    severity: Severity,
    message: Option<String>,
    suggestion: Option<String>,
}

impl ImportRuleConfig {
    /// Creates a new import rule configuration.
    ///
    /// Layer patterns are kept as given; their security checks run in the
    /// engine so that a bad layer fails only its own rule.
    ///
    /// # Errors
    ///
    /// Returns error if the name is blank or the layer list is empty.
    pub fn new(
        name: impl Into<String>,
        layer: Vec<String>,
        constraints: ImportConstraints,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyRuleName);
        }
        if layer.is_empty() {
            return Err(ModelError::EmptyLayer { rule: name });
        }
        Ok(Self {
            name,
            description: String::new(),
            layer,
            constraints,
            severity: Severity::Error,
            message: None,
            suggestion: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the severity for violations.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Overrides the generated violation message.
    #[must_use]
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    /// Sets the suggestion attached to violations.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the layer patterns.
    #[must_use]
    pub fn layer(&self) -> &[String] {
        &self.layer
    }

    /// Returns the constraint lists.
    #[must_use]
    pub fn constraints(&self) -> &ImportConstraints {
        &self.constraints
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message override.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the configured suggestion.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }
}

/// A validated rule configuration, one variant per rule kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleConfig {
    /// Import constraints on a layer.
    Import(ImportRuleConfig),
}

impl RuleConfig {
    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Import(c) => c.name(),
        }
    }

    /// Returns the layer patterns.
    #[must_use]
    pub fn layer(&self) -> &[String] {
        match self {
            Self::Import(c) => c.layer(),
        }
    }

    /// Short kind label for listings.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Import(_) => "import",
        }
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Rule name is empty.
    #[error("rule name must not be empty")]
    EmptyRuleName,

    /// Rule has no layer patterns.
    #[error("rule `{rule}` must define at least one layer pattern")]
    EmptyLayer {
        /// The rule name.
        rule: String,
    },

    /// Rule defines none of the known constraint kinds.
    #[error(
        "rule `{rule}` defines no constraints: expected one of \
         must_not_import_from, may_import_from, must_import_from"
    )]
    NoConstraints {
        /// The rule name.
        rule: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints() -> ImportConstraints {
        ImportConstraints::new(vec!["src/ui".into()], vec![], vec!["src/types".into()])
    }

    #[test]
    fn import_rule_config_valid() {
        let config = ImportRuleConfig::new("domain", vec!["src/domain".into()], constraints())
            .unwrap()
            .with_description("Domain isolation")
            .with_severity(Severity::Warning);
        assert_eq!(config.name(), "domain");
        assert_eq!(config.description(), "Domain isolation");
        assert_eq!(config.severity(), Severity::Warning);
        assert_eq!(config.constraints().must_not_import_from(), ["src/ui"]);
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            ImportRuleConfig::new("  ", vec!["src".into()], constraints()),
            Err(ModelError::EmptyRuleName)
        ));
    }

    #[test]
    fn empty_layer_rejected() {
        assert!(matches!(
            ImportRuleConfig::new("r", vec![], constraints()),
            Err(ModelError::EmptyLayer { .. })
        ));
    }

    #[test]
    fn active_kinds_lists_non_empty_constraints() {
        assert_eq!(
            constraints().active_kinds(),
            vec!["must_not_import_from", "must_import_from"]
        );
        assert!(ImportConstraints::default().active_kinds().is_empty());
    }

    #[test]
    fn rule_config_accessors() {
        let config = RuleConfig::Import(
            ImportRuleConfig::new("r", vec!["src/a".into(), "src/b".into()], constraints())
                .unwrap(),
        );
        assert_eq!(config.name(), "r");
        assert_eq!(config.layer().len(), 2);
        assert_eq!(config.kind(), "import");
    }
}
