//! Directory index builder

use crate::error::StorageError;
use crate::index::path::index_key;
use crate::index::walker::{Walker, WalkerConfig};
use crate::module::Module;
use crate::people::PersonId;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// The slice of a module an index entry needs. Identity is the machine name.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRef {
    pub machine_name: String,
    pub name: Option<String>,
    pub owners: Vec<PersonId>,
    pub peers: Vec<PersonId>,
    #[serde(skip)]
    pub exclude_module_paths: bool,
}

impl From<&Module> for ModuleRef {
    fn from(module: &Module) -> Self {
        Self {
            machine_name: module.machine_name.clone(),
            name: module.name.clone(),
            owners: module.owners.clone(),
            peers: module.peers.clone(),
            exclude_module_paths: module.exclude_module_paths,
        }
    }
}

impl PartialEq for ModuleRef {
    fn eq(&self, other: &Self) -> bool {
        self.machine_name == other.machine_name
    }
}

impl Eq for ModuleRef {}

impl PartialOrd for ModuleRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.machine_name.cmp(&other.machine_name)
    }
}

impl Hash for ModuleRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.machine_name.hash(state);
    }
}

/// Mapping from absolute path to the modules claiming it, most specific first.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    entries: BTreeMap<PathBuf, Vec<ModuleRef>>,
}

impl DirectoryIndex {
    /// Modules claiming `path`, or `None` when the path has no entry.
    pub fn get(&self, path: &Path) -> Option<&[ModuleRef]> {
        self.entries.get(&index_key(path)).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&index_key(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Vec<ModuleRef>)> {
        self.entries.iter()
    }

    /// Machine names claiming `path`, in index order.
    pub fn machine_names(&self, path: &Path) -> Vec<&str> {
        self.get(path)
            .unwrap_or_default()
            .iter()
            .map(|module| module.machine_name.as_str())
            .collect()
    }
}

/// Builds a [`DirectoryIndex`] from a module forest.
pub struct IndexBuilder {
    root: PathBuf,
    full_paths: bool,
    walker_config: Option<WalkerConfig>,
}

impl IndexBuilder {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            full_paths: false,
            walker_config: None,
        }
    }

    /// Seed the index with every path in the repository, so unclaimed paths show up with
    /// an empty module list. Version control directories are skipped.
    pub fn with_full_paths(mut self, full_paths: bool) -> Self {
        self.full_paths = full_paths;
        self
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = Some(config);
        self
    }

    /// Build the index.
    ///
    /// Submodules are indexed before the module that contains them. Once every module is
    /// in, a path claimed by more than one module drops the claimants that set
    /// `exclude_module_paths`. When all claimants set it, the path keeps an empty list.
    #[instrument(skip(self, modules), fields(repo = %self.root.display(), full_paths = self.full_paths))]
    pub fn build(&self, modules: &[Module]) -> Result<DirectoryIndex, StorageError> {
        let start = Instant::now();
        let mut entries: BTreeMap<PathBuf, Vec<ModuleRef>> = BTreeMap::new();

        if self.full_paths {
            let walker = match &self.walker_config {
                Some(config) => Walker::with_config(self.root.clone(), config.clone()),
                None => Walker::new(self.root.clone()),
            };
            for path in walker.walk()? {
                entries.insert(index_key(&path), Vec::new());
            }
            debug!(paths = entries.len(), "Seeded index with repository paths");
        }

        for module in modules {
            add_module(&mut entries, module);
        }

        let mut contested = 0;
        for claimants in entries.values_mut() {
            if claimants.len() > 1 {
                contested += 1;
                claimants.retain(|module| !module.exclude_module_paths);
            }
        }

        info!(
            paths = entries.len(),
            contested,
            duration_ms = start.elapsed().as_millis(),
            "Directory index built"
        );
        Ok(DirectoryIndex { entries })
    }
}

fn add_module(entries: &mut BTreeMap<PathBuf, Vec<ModuleRef>>, module: &Module) {
    for submodule in &module.submodules {
        add_module(entries, submodule);
    }
    debug!(module = %module.machine_name, "Updating index");
    let reference = ModuleRef::from(module);
    for path in module.calculate_paths() {
        entries
            .entry(index_key(&path))
            .or_default()
            .push(reference.clone());
    }
}
