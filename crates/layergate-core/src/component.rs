//! Analyzed source components, as produced by the import analyzer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One import statement extracted from a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    /// Import specifier exactly as written (e.g. `"../ui/Button"`).
    pub path: String,
    /// Line number (1-indexed), when the analyzer recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ImportRef {
    /// Creates an import without line information.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
        }
    }

    /// Creates an import at a given line.
    #[must_use]
    pub fn at_line(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line: Some(line),
        }
    }

    /// Returns the line number if it is a valid (positive) one.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.line.filter(|&l| l > 0)
    }
}

/// One analyzed source file.
///
/// `imports` keeps source order and is never deduplicated. `dependencies`
/// holds only names of other components in the same analysis; external
/// packages never appear there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Display id, unique within a graph.
    pub name: String,
    /// Project-relative, forward-slash path.
    pub file_path: String,
    /// Directory containing the file.
    #[serde(default, deserialize_with = "lenient_string")]
    pub directory: String,
    /// Heuristic tag (e.g. `"service"`); not used for validation.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    /// Imports in source order. Malformed entries are dropped on input.
    #[serde(default, deserialize_with = "lenient_imports")]
    pub imports: Vec<ImportRef>,
    /// Names of components this one depends on. Non-string entries are
    /// dropped on input.
    #[serde(default, deserialize_with = "lenient_names")]
    pub dependencies: Vec<String>,
}

impl Component {
    /// Creates a component with no imports or dependencies.
    ///
    /// `directory` is derived from `file_path`.
    #[must_use]
    pub fn new(name: impl Into<String>, file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let directory = crate::utils::paths::dirname(&file_path).to_string();
        Self {
            name: name.into(),
            file_path,
            directory,
            kind: String::new(),
            imports: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Appends an import.
    #[must_use]
    pub fn with_import(mut self, import: ImportRef) -> Self {
        self.imports.push(import);
        self
    }

    /// Appends a resolved dependency by component name.
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

}

// Analyzer output is only loosely trusted: a bad nested value must not
// cost the whole component, or its file silently leaves every layer.

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_imports<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ImportRef>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let total = items.len();
    let imports: Vec<ImportRef> = items.into_iter().filter_map(import_from_value).collect();
    if imports.len() < total {
        tracing::debug!(
            "Dropped {} of {} malformed import entries",
            total - imports.len(),
            total
        );
    }
    Ok(imports)
}

/// `{ "path": string, "line"?: positive integer }`. A bad `line` becomes
/// `None`; a missing or non-string `path` drops the entry.
fn import_from_value(item: Value) -> Option<ImportRef> {
    let Value::Object(mut map) = item else {
        return None;
    };
    let Some(Value::String(path)) = map.remove("path") else {
        return None;
    };
    let line = map
        .get("line")
        .and_then(Value::as_u64)
        .and_then(|l| u32::try_from(l).ok())
        .filter(|&l| l > 0);
    Some(ImportRef { path, line })
}

fn lenient_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}
