//! Path queries against the directory index

use crate::index::path::normalize_query_path;
use crate::index::{DirectoryIndex, ModuleRef};
use crate::people::PersonId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Add;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Outcome of resolving a batch of paths.
///
/// `paths`, `modules`, `owners` and `peers` are derived from `path_map` and are recomputed
/// whenever results are combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub path_map: BTreeMap<String, Vec<ModuleRef>>,
    pub paths: BTreeSet<String>,
    pub rejected_paths: BTreeSet<String>,
    pub modules: BTreeSet<ModuleRef>,
    pub owners: BTreeSet<PersonId>,
    pub peers: BTreeSet<PersonId>,
}

impl QueryResult {
    pub fn new(
        path_map: BTreeMap<String, Vec<ModuleRef>>,
        rejected_paths: BTreeSet<String>,
    ) -> Self {
        let mut result = Self {
            path_map,
            rejected_paths,
            ..Self::default()
        };
        result.recompute();
        result
    }

    fn recompute(&mut self) {
        self.paths = self.path_map.keys().cloned().collect();
        self.modules = self.path_map.values().flatten().cloned().collect();
        // From every entry: `modules` keeps one ref per machine name.
        self.owners = self
            .path_map
            .values()
            .flatten()
            .flat_map(|module| module.owners.iter().copied())
            .collect();
        self.peers = self
            .path_map
            .values()
            .flatten()
            .flat_map(|module| module.peers.iter().copied())
            .collect();
    }

    /// Nothing resolved and nothing rejected.
    pub fn is_empty(&self) -> bool {
        self.path_map.is_empty() && self.rejected_paths.is_empty()
    }

    /// Combine with another result. On a key collision the entry from `other` wins;
    /// a path rejected by either side stays rejected.
    pub fn merge(mut self, other: QueryResult) -> QueryResult {
        self.path_map.extend(other.path_map);
        self.rejected_paths.extend(other.rejected_paths);
        self.recompute();
        self
    }
}

impl Add for QueryResult {
    type Output = QueryResult;

    fn add(self, other: QueryResult) -> QueryResult {
        self.merge(other)
    }
}

/// Resolve `paths` (relative to `repo_path`) against the index.
///
/// Paths that do not exist on disk are rejected, which is a normal result. Existing
/// paths with no index entry resolve to an empty module list.
#[instrument(skip(index, paths), fields(repo = %repo_path.display(), count = paths.len()))]
pub fn query<S: AsRef<str>>(index: &DirectoryIndex, repo_path: &Path, paths: &[S]) -> QueryResult {
    let mut path_map = BTreeMap::new();
    let mut rejected = BTreeSet::new();

    for raw in paths {
        let relative = normalize_query_path(raw.as_ref());
        let absolute = repo_path.join(&relative);
        if !absolute.exists() {
            warn!(path = raw.as_ref(), "Path does not exist, skipping");
            rejected.insert(raw.as_ref().to_string());
            continue;
        }
        let modules = index.get(&absolute).map(<[ModuleRef]>::to_vec).unwrap_or_default();
        path_map.insert(relative, modules);
    }

    let result = QueryResult::new(path_map, rejected);
    info!(
        resolved = result.paths.len(),
        rejected = result.rejected_paths.len(),
        modules = result.modules.len(),
        "Query resolved"
    );
    result
}
