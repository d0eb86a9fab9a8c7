//! Rule engine: runs rules over a component graph and aggregates results.
//!
//! Rules run sequentially. Each one goes through
//! `setup (compile layer) → files in layer → validate per file → aggregate`.
//! A failure is contained in the smallest unit it affects: a bad layer
//! pattern fails its rule, a per-file error becomes a violation for that
//! file, and the run always completes.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::graph::ComponentGraph;
use crate::pattern::{Matcher, PatternCache, PatternError, PatternOptions};
use crate::rule::{Rule, RuleBox};
use crate::types::{RuleResult, RuleStatus, ValidationResults, Violation};

/// Runs rules against a [`ComponentGraph`].
///
/// Holds the layer pattern cache, so one engine should serve one
/// validation run at a time.
#[derive(Debug, Default)]
pub struct RuleEngine {
    cache: PatternCache,
    options: PatternOptions,
}

impl RuleEngine {
    /// Creates an engine with default glob options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with custom glob options for layer patterns.
    #[must_use]
    pub fn with_pattern_options(options: PatternOptions) -> Self {
        Self {
            cache: PatternCache::new(),
            options,
        }
    }

    /// Returns the layer pattern cache.
    #[must_use]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Validates every rule against the graph.
    ///
    /// Never fails: problems with individual rules or files are reported
    /// as violations in the returned results.
    pub fn validate(&mut self, rules: &[RuleBox], graph: &ComponentGraph) -> ValidationResults {
        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut results = Vec::with_capacity(rules.len());

        for rule in rules {
            let duplicate = !seen_names.insert(rule.name());
            results.push(self.run_rule(rule.as_ref(), graph, duplicate));
        }

        let results = ValidationResults::from_rules(results);
        info!(
            "Validated {} rule(s): {} passed, {} failed, {} violation(s)",
            results.summary.total,
            results.summary.passed,
            results.summary.failed,
            results.summary.violations
        );
        results
    }

    fn run_rule(&mut self, rule: &dyn Rule, graph: &ComponentGraph, duplicate: bool) -> RuleResult {
        let mut violations = Vec::new();

        if duplicate {
            violations.push(
                Violation::new(
                    rule.name(),
                    rule.severity(),
                    "",
                    format!("Duplicate rule name `{}`", rule.name()),
                )
                .with_suggestion("Give every rule a unique name"),
            );
        }

        let matchers = match self.compile_layer(rule.layer()) {
            Ok(matchers) => matchers,
            Err(e) => {
                debug!("Rule `{}` setup failed: {e}", rule.name());
                violations.push(Violation::new(
                    rule.name(),
                    rule.severity(),
                    "",
                    format!("Rule setup failed: {e}"),
                ));
                return finish(rule, violations, 0, None);
            }
        };

        let files = graph.get_files_in_layer(&matchers);
        debug!("Rule `{}` matched {} file(s)", rule.name(), files.len());

        if files.is_empty() && violations.is_empty() {
            let message = format!(
                "No files matched layer [{}]",
                rule.layer().join(", ")
            );
            return finish(rule, violations, 0, Some(message));
        }

        for file in &files {
            match rule.validate(file, graph) {
                Ok(found) => violations.extend(found),
                Err(e) => {
                    debug!(
                        "Rule `{}` failed on {}: {e}",
                        rule.name(),
                        file.file_path
                    );
                    violations.push(Violation::new(
                        rule.name(),
                        rule.severity(),
                        &file.file_path,
                        format!("Validation failed: {e}"),
                    ));
                }
            }
        }

        finish(rule, violations, files.len(), None)
    }

    fn compile_layer(&mut self, patterns: &[String]) -> Result<Vec<Arc<Matcher>>, PatternError> {
        if patterns.is_empty() {
            return Err(PatternError::InvalidPattern {
                pattern: String::new(),
                reason: "rule has no layer patterns".to_string(),
            });
        }
        patterns
            .iter()
            .map(|p| self.cache.get_matcher(p, self.options))
            .collect()
    }
}

/// Builds the rule result. `skip_message` marks the rule as skipped.
fn finish(
    rule: &dyn Rule,
    violations: Vec<Violation>,
    files_checked: usize,
    skip_message: Option<String>,
) -> RuleResult {
    let status = if skip_message.is_some() {
        RuleStatus::Skipped
    } else if violations.is_empty() {
        RuleStatus::Passed
    } else {
        RuleStatus::Failed
    };
    debug!("Rule `{}` {status}", rule.name());

    RuleResult {
        name: rule.name().to_string(),
        description: rule.description().to_string(),
        status,
        files_checked,
        violations,
        message: skip_message,
    }
}
