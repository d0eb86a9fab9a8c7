//! Forward-slash path utilities for import and layer matching.
//!
//! All paths handled by the engine are project-relative strings. These
//! helpers never touch the filesystem.

/// Converts backslashes to forward slashes.
#[must_use]
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalizes a path POSIX-style, collapsing `.` and `..` segments.
///
/// Leading `..` segments that cannot be collapsed are kept, so an escaping
/// path stays recognizable. An empty result becomes `"."`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("src/domain/../ui/Button"), "src/ui/Button");
/// assert_eq!(normalize("./src"), "src");
/// assert_eq!(normalize("a/../../b"), "../b");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let path = to_forward_slashes(path);
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Returns the directory part of a path (`"."` when there is none).
#[must_use]
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Joins `relative` onto `base` and normalizes the result.
#[must_use]
pub fn join(base: &str, relative: &str) -> String {
    normalize(&format!("{base}/{relative}"))
}

/// Checks if `path` is `prefix` itself or lies beneath it on a
/// directory boundary.
///
/// `src/ui/Button` is under `src/ui`; `src/ui-core/Button` is not.
#[must_use]
pub fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
}

/// Iterates over the parent directories of a path, nearest first.
///
/// `"src/a/b.ts"` yields `"src/a"`, then `"src"`.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.char_indices()
        .rev()
        .filter(|&(i, c)| c == '/' && i > 0)
        .map(move |(i, _)| &path[..i])
}
