//! # layergate-core
//!
//! Validates a codebase's import graph against declarative layering rules.
//!
//! This crate provides:
//!
//! - [`ComponentGraph`] - indexed view over analyzed source files, with
//!   reverse-dependency lookups and cycle detection
//! - [`PatternCache`] / [`Matcher`] - validated, cached glob matchers
//! - [`Rule`] trait and the declarative [`ImportRule`]
//! - [`RuleEngine`] - runs rules and aggregates [`ValidationResults`]
//!
//! ## Example
//!
//! ```ignore
//! use layergate_core::{declarative, ComponentGraph, RuleEngine};
//!
//! let rules = declarative::load_rules_from_toml(&toml_text)?;
//! let graph = ComponentGraph::from_json(serde_json::from_str(&analysis_json)?)?;
//!
//! let results = RuleEngine::new().validate(&rules, &graph);
//! println!("{} violation(s)", results.summary.violations);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod component;
mod engine;
mod graph;
mod pattern;
mod rule;
mod types;

/// Declarative TOML rule configuration.
pub mod declarative;
/// Path helpers used by matching.
pub mod utils;

pub use component::{Component, ImportRef};
pub use declarative::rules::ImportRule;
pub use engine::RuleEngine;
pub use graph::{ComponentGraph, GraphError, MAX_COMPONENTS, MAX_CYCLE_DEPTH};
pub use pattern::{
    has_wildcard, validate_pattern, Matcher, PatternCache, PatternError, PatternOptions,
    MAX_CACHE_ENTRIES,
};
pub use rule::{Rule, RuleBox, RuleError};
pub use types::{RuleResult, RuleStatus, Severity, Summary, ValidationResults, Violation};
