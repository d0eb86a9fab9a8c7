//! Declarative layer rules driven by TOML configuration.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! Vec<RuleConfig> (pure domain model)
//!   ↓ create_rules()
//! Vec<RuleBox>
//! ```

use std::sync::Arc;

pub mod config_dto;
pub mod loader;
pub mod model;
pub mod rules;

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content into validated rule configs.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn parse_rule_configs(content: &str) -> Result<Vec<model::RuleConfig>, LoadRulesError> {
    let dto: config_dto::RulesConfigDto = toml::from_str(content)?;
    Ok(loader::load(dto)?)
}

/// Parses TOML content and creates all rules, in file order.
///
/// Returns `Ok(vec![])` if no rules are defined.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<crate::rule::RuleBox>, LoadRulesError> {
    Ok(create_rules(parse_rule_configs(content)?))
}

/// Creates one rule per config, selecting the implementation by variant.
#[must_use]
pub fn create_rules(configs: Vec<model::RuleConfig>) -> Vec<crate::rule::RuleBox> {
    configs
        .into_iter()
        .map(|config| -> crate::rule::RuleBox {
            match config {
                model::RuleConfig::Import(c) => Box::new(rules::ImportRule::new(Arc::new(c))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rules_in_file_order() {
        let rules = load_rules_from_toml(
            r#"
[[rules]]
name = "first"
layer = "src/domain"
must_not_import_from = ["src/ui"]

[[rules]]
name = "second"
layer = ["src/api"]
may_import_from = ["src/domain"]
"#,
        )
        .unwrap();
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(rules[1].layer(), ["src/api"]);
    }

    #[test]
    fn invalid_toml_is_reported() {
        assert!(matches!(
            load_rules_from_toml("[[rules]\nname ="),
            Err(LoadRulesError::Toml(_))
        ));
    }

    #[test]
    fn empty_config_yields_no_rules() {
        assert!(load_rules_from_toml("").unwrap().is_empty());
    }
}
