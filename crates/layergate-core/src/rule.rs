//! Rule trait for layer constraints.

use crate::component::Component;
use crate::graph::ComponentGraph;
use crate::pattern::PatternError;
use crate::types::{Severity, Violation};

/// Failure while validating a single file.
///
/// The engine records it as a violation for that file and moves on.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A constraint pattern could not be compiled.
    #[error("constraint pattern failed: {0}")]
    Pattern(#[from] PatternError),

    /// Any other per-file failure.
    #[error("{0}")]
    Other(String),
}

/// A layer rule: a set of files (the layer) and a per-file check.
///
/// The engine resolves [`Rule::layer`] patterns to files and calls
/// [`Rule::validate`] once per file. New rule kinds implement this trait
/// without touching the engine.
///
/// # Example
///
/// ```ignore
/// use layergate_core::{Component, ComponentGraph, Rule, RuleError, Severity, Violation};
///
/// pub struct NoOrphans { layer: Vec<String> }
///
/// impl Rule for NoOrphans {
///     fn name(&self) -> &str { "no-orphans" }
///     fn layer(&self) -> &[String] { &self.layer }
///
///     fn validate(&self, file: &Component, graph: &ComponentGraph)
///         -> Result<Vec<Violation>, RuleError>
///     {
///         if graph.get_dependents(&file.name).is_empty() {
///             return Ok(vec![Violation::new(self.name(), Severity::Warning,
///                 &file.file_path, "nothing imports this file")]);
///         }
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Unique name of this rule.
    fn name(&self) -> &str;

    /// Brief description of what this rule checks.
    fn description(&self) -> &str {
        ""
    }

    /// Layer patterns, OR-combined.
    fn layer(&self) -> &[String];

    /// Severity for violations from this rule.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks one file of the layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be checked. The engine turns it
    /// into a violation for this file only.
    fn validate(&self, file: &Component, graph: &ComponentGraph)
        -> Result<Vec<Violation>, RuleError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule {
        layer: Vec<String>,
    }

    impl Rule for TestRule {
        fn name(&self) -> &str {
            "test-rule"
        }

        fn layer(&self) -> &[String] {
            &self.layer
        }

        fn validate(
            &self,
            file: &Component,
            _graph: &ComponentGraph,
        ) -> Result<Vec<Violation>, RuleError> {
            Ok(vec![Violation::new(
                self.name(),
                self.severity(),
                &file.file_path,
                "Test violation",
            )])
        }
    }

    #[test]
    fn test_rule_trait_defaults() {
        let rule = TestRule {
            layer: vec!["src".into()],
        };
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.description(), "");
        assert_eq!(rule.severity(), Severity::Error);

        let graph = ComponentGraph::default();
        let v = rule
            .validate(&Component::new("A", "src/A.ts"), &graph)
            .unwrap();
        assert_eq!(v[0].file, "src/A.ts");
    }
}
