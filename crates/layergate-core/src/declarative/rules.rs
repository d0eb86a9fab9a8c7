//! Declarative rule implementations.
//!
//! Converts domain model rule configs into [`Rule`] trait implementations.

use std::sync::{Arc, Mutex, PoisonError};

use crate::component::{Component, ImportRef};
use crate::declarative::model::ImportRuleConfig;
use crate::graph::ComponentGraph;
use crate::pattern::{has_wildcard, PatternCache, PatternOptions};
use crate::rule::{Rule, RuleError};
use crate::types::{Severity, Violation};
use crate::utils::paths;

// ────────────────────────────────────────────
// Import rule
// ────────────────────────────────────────────

/// Enforces forbidden, allowed, and required imports for a layer.
///
/// Wildcard constraint patterns are compiled lazily into a cache owned by
/// the rule, separate from the engine's layer cache.
pub struct ImportRule {
    config: Arc<ImportRuleConfig>,
    matchers: Mutex<PatternCache>,
}

impl ImportRule {
    /// Creates a new import rule.
    #[must_use]
    pub fn new(config: Arc<ImportRuleConfig>) -> Self {
        Self {
            config,
            matchers: Mutex::new(PatternCache::new()),
        }
    }

    /// Returns the rule configuration.
    #[must_use]
    pub fn config(&self) -> &ImportRuleConfig {
        &self.config
    }

    /// Tests an import against one constraint pattern.
    ///
    /// Match order: exact path, directory boundary (`src/ui` covers
    /// `src/ui/Button` but not `src/ui-core`), glob for patterns with `*`
    /// or `?`, then exact/boundary against the import resolved relative to
    /// `source_file` when it starts with `.`. An empty pattern never
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns an error if a wildcard pattern fails validation or compilation.
    pub fn matches_pattern(
        &self,
        import_path: &str,
        pattern: &str,
        source_file: &str,
    ) -> Result<bool, RuleError> {
        let pattern = paths::to_forward_slashes(pattern);
        let pattern = pattern.strip_suffix('/').unwrap_or(&pattern);
        if pattern.is_empty() {
            return Ok(false);
        }

        let import_path = paths::to_forward_slashes(import_path);
        if paths::is_under(&import_path, pattern) {
            return Ok(true);
        }

        if has_wildcard(pattern) {
            let matcher = self
                .matchers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_matcher(pattern, PatternOptions::default())?;
            if matcher.is_match(&import_path) {
                return Ok(true);
            }
        }

        if import_path.starts_with('.') {
            let resolved = resolve_import(&import_path, source_file);
            return Ok(paths::is_under(&resolved, pattern));
        }

        Ok(false)
    }

    fn first_match<'p>(
        &self,
        import: &ImportRef,
        patterns: &'p [String],
        source_file: &str,
    ) -> Result<Option<&'p str>, RuleError> {
        for pattern in patterns {
            if self.matches_pattern(&import.path, pattern, source_file)? {
                return Ok(Some(pattern.as_str()));
            }
        }
        Ok(None)
    }

    fn violation(&self, file: &Component, message: String, default_help: &str) -> Violation {
        let message = self.config.message().map_or(message, str::to_string);
        let help = self.config.suggestion().unwrap_or(default_help);
        Violation::new(
            self.config.name(),
            self.config.severity(),
            &file.file_path,
            message,
        )
        .with_suggestion(help)
    }

    fn import_violation(
        &self,
        file: &Component,
        import: &ImportRef,
        message: String,
        default_help: &str,
    ) -> Violation {
        self.violation(file, message, default_help)
            .with_line(import.line())
            .with_related_file(resolve_import(&import.path, &file.file_path))
    }

    /// Blacklist: one violation per import, on the first forbidden pattern it hits.
    fn check_forbidden(&self, file: &Component) -> Result<Vec<Violation>, RuleError> {
        let forbidden = self.config.constraints().must_not_import_from();
        let mut violations = Vec::new();
        if forbidden.is_empty() {
            return Ok(violations);
        }

        for import in &file.imports {
            if let Some(pattern) = self.first_match(import, forbidden, &file.file_path)? {
                violations.push(self.import_violation(
                    file,
                    import,
                    format!(
                        "`{}` must not import from `{pattern}` (imports `{}`)",
                        file.file_path, import.path
                    ),
                    "Move the shared code to a lower layer or depend on an abstraction",
                ));
            }
        }
        Ok(violations)
    }

    /// Whitelist: one violation per import matching no allowed pattern.
    fn check_allowed(&self, file: &Component) -> Result<Vec<Violation>, RuleError> {
        let allowed = self.config.constraints().may_import_from();
        let mut violations = Vec::new();
        if allowed.is_empty() {
            return Ok(violations);
        }

        for import in &file.imports {
            if self
                .first_match(import, allowed, &file.file_path)?
                .is_none()
            {
                violations.push(self.import_violation(
                    file,
                    import,
                    format!(
                        "`{}` imports `{}`, which is not in the allowed list [{}]",
                        file.file_path,
                        import.path,
                        allowed.join(", ")
                    ),
                    "Only import from the layers this rule allows",
                ));
            }
        }
        Ok(violations)
    }

    /// Required: one violation per required pattern no import matches.
    fn check_required(&self, file: &Component) -> Result<Vec<Violation>, RuleError> {
        let required = self.config.constraints().must_import_from();
        let mut violations = Vec::new();

        for pattern in required {
            let mut found = false;
            for import in &file.imports {
                if self.matches_pattern(&import.path, pattern, &file.file_path)? {
                    found = true;
                    break;
                }
            }
            if !found {
                violations.push(
                    self.violation(
                        file,
                        format!(
                            "`{}` must import from `{pattern}` but does not",
                            file.file_path
                        ),
                        "Add the required import",
                    )
                    .with_related_file(pattern.as_str()),
                );
            }
        }
        Ok(violations)
    }
}

impl Rule for ImportRule {
    fn name(&self) -> &str {
        self.config.name()
    }

    fn description(&self) -> &str {
        self.config.description()
    }

    fn layer(&self) -> &[String] {
        self.config.layer()
    }

    fn severity(&self) -> Severity {
        self.config.severity()
    }

    fn validate(
        &self,
        file: &Component,
        _graph: &ComponentGraph,
    ) -> Result<Vec<Violation>, RuleError> {
        let mut violations = self.check_forbidden(file)?;
        violations.extend(self.check_allowed(file)?);
        violations.extend(self.check_required(file)?);
        Ok(violations)
    }
}

/// Resolves a relative import against the importing file's directory.
/// Non-relative imports are returned slash-normalized but otherwise as is.
fn resolve_import(import_path: &str, source_file: &str) -> String {
    let import_path = paths::to_forward_slashes(import_path);
    if import_path.starts_with('.') {
        let source = paths::to_forward_slashes(source_file);
        paths::join(paths::dirname(&source), &import_path)
    } else {
        import_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarative::model::ImportConstraints;

    fn rule(forbidden: &[&str], allowed: &[&str], required: &[&str]) -> ImportRule {
        let to_vec = |xs: &[&str]| xs.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        let config = ImportRuleConfig::new(
            "test-rule",
            vec!["src".into()],
            ImportConstraints::new(to_vec(forbidden), to_vec(allowed), to_vec(required)),
        )
        .unwrap();
        ImportRule::new(Arc::new(config))
    }

    fn file(path: &str, imports: &[(&str, u32)]) -> Component {
        imports
            .iter()
            .fold(Component::new("F", path), |c, (p, line)| {
                c.with_import(ImportRef::at_line(*p, *line))
            })
    }

    fn check(rule: &ImportRule, file: &Component) -> Vec<Violation> {
        rule.validate(file, &ComponentGraph::default()).unwrap()
    }

    // -- pattern matching --

    #[test]
    fn exact_and_boundary_matches() {
        let r = rule(&[], &[], &[]);
        assert!(r.matches_pattern("src/ui", "src/ui", "src/a.ts").unwrap());
        assert!(r.matches_pattern("src/ui/Button", "src/ui", "src/a.ts").unwrap());
        assert!(r.matches_pattern("src/ui/Button", "src/ui/", "src/a.ts").unwrap());
        assert!(!r.matches_pattern("src/ui-core/Button", "src/ui", "src/a.ts").unwrap());
    }

    #[test]
    fn empty_pattern_never_matches() {
        let r = rule(&[], &[], &[]);
        assert!(!r.matches_pattern("src/ui", "", "src/a.ts").unwrap());
        assert!(!r.matches_pattern("", "", "src/a.ts").unwrap());
    }

    #[test]
    fn wildcard_patterns_use_glob() {
        let r = rule(&[], &[], &[]);
        assert!(r.matches_pattern("src/ui/Button", "src/*/Button", "src/a.ts").unwrap());
        assert!(r.matches_pattern("src/a/b/infra", "src/**/infra", "src/a.ts").unwrap());
        assert!(!r.matches_pattern("src/ui/deep/Button", "src/*/Button", "src/a.ts").unwrap());
    }

    #[test]
    fn relative_imports_resolve_against_source_dir() {
        let r = rule(&[], &[], &[]);
        assert!(r
            .matches_pattern("../ui/Button", "src/ui", "src/domain/User.ts")
            .unwrap());
        assert!(r
            .matches_pattern("./helpers", "src/domain/helpers", "src/domain/User.ts")
            .unwrap());
        assert!(!r
            .matches_pattern("../ui-core/Button", "src/ui", "src/domain/User.ts")
            .unwrap());
    }

    #[test]
    fn insecure_wildcard_pattern_is_an_error() {
        let r = rule(&[], &[], &[]);
        assert!(r.matches_pattern("x", "../*", "src/a.ts").is_err());
    }

    // -- forbidden --

    #[test]
    fn forbidden_relative_import_reports_resolved_path() {
        let r = rule(&["src/ui"], &[], &[]);
        let f = file("src/domain/User.ts", &[("../ui/Button", 15)]);
        let v = check(&r, &f);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].file, "src/domain/User.ts");
        assert_eq!(v[0].line, Some(15));
        assert_eq!(v[0].related_file.as_deref(), Some("src/ui/Button"));
        assert_eq!(v[0].severity, Severity::Error);
    }

    #[test]
    fn forbidden_short_circuits_per_import() {
        let r = rule(&["src/ui", "src/ui/Button", "src/*"], &[], &[]);
        let f = file("src/domain/User.ts", &[("src/ui/Button", 1), ("src/ui/Modal", 2)]);
        let v = check(&r, &f);
        assert_eq!(v.len(), 2);
        assert!(v[0].message.contains("`src/ui`"));
    }

    // -- allowed --

    #[test]
    fn allowed_reports_each_disallowed_import() {
        let r = rule(&[], &["src/domain", "src/shared"], &[]);
        let f = file(
            "src/api/Orders.ts",
            &[("src/domain/Order", 1), ("src/ui/Button", 2), ("src/db/Pool", 3)],
        );
        let v = check(&r, &f);
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].line, Some(2));
        assert_eq!(v[1].line, Some(3));
    }

    #[test]
    fn empty_allowed_list_is_inactive() {
        let r = rule(&[], &[], &[]);
        let f = file("src/api/Orders.ts", &[("anything", 1)]);
        assert!(check(&r, &f).is_empty());
    }

    // -- required --

    #[test]
    fn required_missing_reports_once_per_pattern() {
        let r = rule(&[], &[], &["src/types", "src/logger"]);
        let f = file("src/services/Svc.ts", &[("src/types/User", 1), ("src/other", 2)]);
        let v = check(&r, &f);
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("src/logger"));
        assert_eq!(v[0].line, None);

        let empty = file("src/services/Empty.ts", &[]);
        assert_eq!(check(&r, &empty).len(), 2);
    }

    // -- combined --

    #[test]
    fn checks_accumulate_across_kinds() {
        let r = rule(&["src/ui"], &["src/domain"], &["src/types"]);
        let f = file("src/api/A.ts", &[("src/ui/Button", 3)]);
        let v = check(&r, &f);
        // forbidden + not allowed + missing required
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn config_overrides_message_and_suggestion() {
        let config = ImportRuleConfig::new(
            "custom",
            vec!["src".into()],
            ImportConstraints::new(vec!["src/ui".into()], vec![], vec![]),
        )
        .unwrap()
        .with_message(Some("No UI here".into()))
        .with_suggestion(Some("Use ports".into()))
        .with_severity(Severity::Warning);
        let r = ImportRule::new(Arc::new(config));
        let v = check(&r, &file("src/a.ts", &[("src/ui/x", 1)]));
        assert_eq!(v[0].message, "No UI here");
        assert_eq!(v[0].suggestion.as_deref(), Some("Use ports"));
        assert_eq!(v[0].severity, Severity::Warning);
    }

    #[test]
    fn bad_wildcard_constraint_fails_validation() {
        let r = rule(&["src/[ui*"], &[], &[]);
        let f = file("src/a.ts", &[("src/ui/x", 1)]);
        assert!(r.validate(&f, &ComponentGraph::default()).is_err());
    }
}
