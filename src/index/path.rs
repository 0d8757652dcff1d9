//! Path normalization for index keys and query strings

use crate::error::StorageError;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize the repository root (resolves symlinks, `..`, `.`).
pub fn canonicalize_root(path: &Path) -> Result<PathBuf, StorageError> {
    dunce::canonicalize(path).map_err(|e| {
        StorageError::InvalidPath(format!("Failed to canonicalize {}: {}", path.display(), e))
    })
}

/// Normalize a path string without filesystem access.
///
/// Unicode is composed to NFC and trailing separators are removed (except for the root),
/// so `"café/"` typed by a user and `"café"` decomposed by the filesystem agree.
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().collect();
    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }
    result
}

/// Key under which an absolute path is stored in the index.
pub fn index_key(path: &Path) -> PathBuf {
    PathBuf::from(normalize_path_string(&path.to_string_lossy()))
}

/// Normalize a repository-relative query path: leading `./` and trailing separators go.
/// Whitespace is part of the name and is kept.
pub fn normalize_query_path(path: &str) -> String {
    let normalized = normalize_path_string(path);
    let mut trimmed = normalized.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}
