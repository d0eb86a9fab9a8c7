//! Glob pattern validation, compilation, and caching.
//!
//! Every pattern goes through [`validate_pattern`] before it is compiled,
//! so an insecure pattern is never compiled or cached.

use std::collections::HashMap;
use std::sync::Arc;

use crate::utils::paths;

/// Upper bound on cached matchers. Reaching it clears the whole cache.
pub const MAX_CACHE_ENTRIES: usize = 5_000;

/// Errors from pattern validation and compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Pattern rejected by validation or by the glob compiler.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The rejected pattern (null bytes escaped).
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl PatternError {
    fn invalid(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.escape_default().to_string(),
            reason: reason.into(),
        }
    }
}

/// Checks that a pattern is safe to compile.
///
/// Rejects empty patterns, null bytes, patterns that climb out of the
/// project (`..`, `../x`), and absolute paths (`/x`, `C:/x`).
///
/// # Errors
///
/// Returns [`PatternError::InvalidPattern`] describing the first failed check.
pub fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
    if pattern.trim().is_empty() {
        return Err(PatternError::invalid(pattern, "pattern must not be empty"));
    }
    if pattern.contains('\0') {
        return Err(PatternError::invalid(pattern, "pattern contains a null byte"));
    }

    let slashed = paths::to_forward_slashes(pattern);
    if slashed.starts_with('/') || has_drive_prefix(&slashed) {
        return Err(PatternError::invalid(
            pattern,
            "absolute paths are not allowed",
        ));
    }

    let normalized = paths::normalize(&slashed);
    if normalized == ".." || normalized.starts_with("../") {
        return Err(PatternError::invalid(
            pattern,
            "pattern escapes the project root",
        ));
    }

    Ok(())
}

/// `C:/...` style prefix.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && bytes.get(2).map_or(true, |&b| b == b'/')
}

/// Returns `true` if the pattern uses `*` or `?` wildcards.
#[must_use]
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Options controlling glob compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternOptions {
    /// Let wildcards match dot-prefixed path segments.
    pub dot: bool,
    /// Match case-sensitively.
    pub case_sensitive: bool,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            dot: true,
            case_sensitive: true,
        }
    }
}

impl PatternOptions {
    fn to_match_options(self) -> glob::MatchOptions {
        glob::MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: !self.dot,
        }
    }
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    raw: String,
    compiled: glob::Pattern,
    options: glob::MatchOptions,
}

impl Matcher {
    /// Validates and compiles a pattern.
    ///
    /// A trailing slash is ignored, so `src/ui/` and `src/ui` are the same
    /// pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the glob syntax is invalid.
    pub fn compile(pattern: &str, options: PatternOptions) -> Result<Self, PatternError> {
        validate_pattern(pattern)?;
        let slashed = paths::to_forward_slashes(pattern);
        let trimmed = match slashed.trim_end_matches('/') {
            "" => slashed.as_str(),
            t => t,
        };
        let compiled =
            glob::Pattern::new(trimmed).map_err(|e| PatternError::invalid(pattern, e.msg))?;
        Ok(Self {
            raw: trimmed.to_string(),
            compiled,
            options: options.to_match_options(),
        })
    }

    /// Returns the pattern text this matcher was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tests the glob against the whole path.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.compiled.matches_with(path, self.options)
    }

    /// Tests a file path with directory-style semantics: the path matches if
    /// the glob matches it or any of its parent directories.
    ///
    /// `src/domain` therefore covers `src/domain/User.ts`, while
    /// `src/domain-x/a.ts` stays outside.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        self.is_match(path) || paths::ancestors(path).any(|dir| self.is_match(dir))
    }
}

impl AsRef<Matcher> for Matcher {
    fn as_ref(&self) -> &Matcher {
        self
    }
}

/// Bounded cache of compiled matchers keyed by pattern and options.
///
/// Eviction is all-or-nothing: once the cache holds [`MAX_CACHE_ENTRIES`]
/// matchers, the next miss clears it before inserting.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: HashMap<(String, PatternOptions), Arc<Matcher>>,
}

impl PatternCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a cached matcher, compiling it on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails validation or compilation.
    /// Failed patterns are never cached.
    pub fn get_matcher(
        &mut self,
        pattern: &str,
        options: PatternOptions,
    ) -> Result<Arc<Matcher>, PatternError> {
        validate_pattern(pattern)?;

        let key = (pattern.to_string(), options);
        if let Some(matcher) = self.entries.get(&key) {
            return Ok(Arc::clone(matcher));
        }

        let matcher = Arc::new(Matcher::compile(pattern, options)?);
        if self.entries.len() >= MAX_CACHE_ENTRIES {
            tracing::warn!(
                "Pattern cache reached {} entries, clearing",
                self.entries.len()
            );
            self.clear();
        }
        self.entries.insert(key, Arc::clone(&matcher));
        Ok(matcher)
    }

    /// Number of cached matchers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached matcher.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
