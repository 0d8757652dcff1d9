//! Glob expansion of include/exclude patterns relative to a repository root.
//!
//! Patterns use shell glob syntax with `**` for any number of directories, so
//! `"canines/**/*"` selects everything below `canines` but not `canines` itself.

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expand one pattern. Invalid patterns and unreadable entries are logged and skipped.
pub fn expand(root: &Path, pattern: &str) -> BTreeSet<PathBuf> {
    let Some(root_str) = root.to_str() else {
        warn!(root = %root.display(), "Repository root is not valid UTF-8, cannot expand patterns");
        return BTreeSet::new();
    };

    let relative = pattern.trim_start_matches('/');
    if relative.is_empty() {
        return BTreeSet::new();
    }
    let full = format!(
        "{}/{}",
        Pattern::escape(root_str.trim_end_matches('/')),
        relative
    );

    let matches = match glob::glob_with(&full, MATCH_OPTIONS) {
        Ok(matches) => matches,
        Err(e) => {
            warn!(pattern, "Invalid glob pattern: {}", e);
            return BTreeSet::new();
        }
    };

    let mut paths = BTreeSet::new();
    for entry in matches {
        match entry {
            Ok(path) => {
                paths.insert(path);
            }
            Err(e) => warn!(pattern, "Skipping unreadable path: {}", e),
        }
    }
    debug!(pattern, matched = paths.len(), "Expanded pattern");
    paths
}

/// Union of the expansions of every pattern.
pub fn expand_all(root: &Path, patterns: &[String]) -> BTreeSet<PathBuf> {
    patterns
        .iter()
        .flat_map(|pattern| expand(root, pattern))
        .collect()
}
