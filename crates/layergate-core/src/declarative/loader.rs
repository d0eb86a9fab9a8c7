//! DTO → Domain model conversion with validation.

use crate::types::Severity;

use super::config_dto::{RuleDto, RulesConfigDto};
use super::model::{ImportConstraints, ImportRuleConfig, ModelError, RuleConfig};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "rules[0]").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },
}

/// Converts a `RulesConfigDto` to validated rule configs, in file order.
///
/// Duplicate rule names are kept; the engine reports them.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: RulesConfigDto) -> Result<Vec<RuleConfig>, LoadError> {
    dto.rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_rule(r, i))
        .collect()
}

/// Picks the rule variant from the constraint keys present.
fn convert_rule(dto: RuleDto, index: usize) -> Result<RuleConfig, LoadError> {
    let ctx = format!("rules[{index}]");
    let severity = parse_severity(&dto.severity, &format!("{ctx}.severity"))?;

    if !dto.has_import_constraints() {
        return Err(LoadError::Validation {
            context: ctx,
            source: ModelError::NoConstraints { rule: dto.name },
        });
    }

    let constraints = ImportConstraints::new(
        dto.must_not_import_from.unwrap_or_default(),
        dto.may_import_from.unwrap_or_default(),
        dto.must_import_from.unwrap_or_default(),
    );

    let config = ImportRuleConfig::new(dto.name, dto.layer.into_patterns(), constraints)
        .map_err(|e| LoadError::Validation {
            context: ctx,
            source: e,
        })?
        .with_description(dto.description)
        .with_severity(severity)
        .with_message(dto.message)
        .with_suggestion(dto.suggestion);

    Ok(RuleConfig::Import(config))
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    value.parse().map_err(|value| LoadError::UnknownSeverity {
        context: context.to_string(),
        value,
    })
}
