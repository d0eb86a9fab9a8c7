//! Core types for violations and validation results.

use serde::{Deserialize, Serialize};

/// Severity level for violations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    #[default]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(other.to_string()),
        }
    }
}

/// A single constraint breach found during validation.
///
/// Violations are built once and never modified after being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Name of the rule that produced this violation.
    pub rule_name: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// File the violation is attributed to (empty for rule-level problems).
    pub file: String,
    /// Line number (1-indexed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Column number (1-indexed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Human-readable message.
    pub message: String,
    /// Suggested fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// The file or import path on the other end of the breach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_file: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        rule_name: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            severity,
            file: file.into(),
            line: None,
            column: None,
            message: message.into(),
            suggestion: None,
            related_file: None,
        }
    }

    /// Sets the line number.
    #[must_use]
    pub fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    /// Adds a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Sets the related file.
    #[must_use]
    pub fn with_related_file(mut self, related: impl Into<String>) -> Self {
        self.related_file = Some(related.into());
        self
    }

    /// `file:line:col`, or `<rule>` for rule-level violations.
    #[must_use]
    pub fn location(&self) -> String {
        let file = if self.file.is_empty() {
            "<rule>"
        } else {
            self.file.as_str()
        };
        match (self.line, self.column) {
            (Some(line), Some(col)) => format!("{file}:{line}:{col}"),
            (Some(line), None) => format!("{file}:{line}"),
            _ => file.to_string(),
        }
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} at {}\n", self.rule_name, self.location());
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(related) = &self.related_file {
            let _ = writeln!(output, "  = import: {related}");
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {suggestion}");
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location(),
            self.severity,
            self.rule_name,
            self.message
        )
    }
}

/// Outcome of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    /// Rule ran and found nothing.
    Passed,
    /// Rule produced at least one violation.
    Failed,
    /// Rule's layer matched no files.
    Skipped,
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of running one rule over its layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    /// Rule name.
    pub name: String,
    /// Rule description.
    pub description: String,
    /// Final status.
    pub status: RuleStatus,
    /// Number of files the rule validated.
    pub files_checked: usize,
    /// Violations in discovery order.
    pub violations: Vec<Violation>,
    /// Why the rule was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Aggregate counts over all rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of rules.
    pub total: usize,
    /// Rules that passed.
    pub passed: usize,
    /// Rules that failed.
    pub failed: usize,
    /// Total violations across all rules.
    pub violations: usize,
}

/// Result of one engine run. Built fresh per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResults {
    /// Aggregate counts.
    pub summary: Summary,
    /// Per-rule results in rule order.
    pub rules: Vec<RuleResult>,
}

impl ValidationResults {
    /// Builds results and computes the summary from per-rule results.
    #[must_use]
    pub fn from_rules(rules: Vec<RuleResult>) -> Self {
        let mut summary = Summary {
            total: rules.len(),
            ..Summary::default()
        };
        for rule in &rules {
            match rule.status {
                RuleStatus::Passed => summary.passed += 1,
                RuleStatus::Failed => summary.failed += 1,
                RuleStatus::Skipped => {}
            }
            summary.violations += rule.violations.len();
        }
        Self { summary, rules }
    }

    /// Iterates over every violation across all rules.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.rules.iter().flat_map(|r| r.violations.iter())
    }

    /// Total number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.summary.violations
    }

    /// Returns true if there are any error-severity violations.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violation meets or exceeds the given severity.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    /// Returns true if no rule failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }
}
