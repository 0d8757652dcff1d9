//! Module tree
//!
//! A [`Module`] is a named unit of ownership: glob patterns that select repository paths,
//! plus the people who own and review them. Modules nest; a submodule copies any list it
//! leaves empty from its parent when the tree is built, and carves its own paths out of the
//! parent's claim unless the parent opts out.
//!
//! [`ModuleSpec`] is the on-disk shape inside the registry document. [`Module`] is the
//! resolved in-memory tree built from it.

use crate::index::resolver;
use crate::people::{Person, PersonId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub use crate::registry::validate::ValidationError;

/// Emeritus lists hold person records, or plain names for people with no directory account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmeritusEntry {
    Person(Person),
    Name(String),
}

impl EmeritusEntry {
    pub fn person_id(&self) -> Option<PersonId> {
        match self {
            EmeritusEntry::Person(person) => Some(person.id),
            EmeritusEntry::Name(_) => None,
        }
    }
}

/// Free-form module metadata. Known keys are typed; anything else is carried through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleMeta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners_emeritus: Vec<EmeritusEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peers_emeritus: Vec<EmeritusEntry>,

    /// Review group handle, rendered as a link in exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl ModuleMeta {
    pub fn is_empty(&self) -> bool {
        self.owners_emeritus.is_empty()
            && self.peers_emeritus.is_empty()
            && self.group.is_none()
            && self.extra.is_empty()
    }
}

/// A module as written in the registry document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    #[serde(default)]
    pub machine_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub includes: Vec<String>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub excludes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<Person>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<Person>,

    #[serde(
        default,
        deserialize_with = "nullable_meta",
        skip_serializing_if = "ModuleMeta::is_empty"
    )]
    pub meta: ModuleMeta,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub exclude_submodule_paths: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude_module_paths: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submodules: Vec<ModuleSpec>,

    /// Machine name of the parent, written only when a submodule is serialized on its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Default for ModuleSpec {
    fn default() -> Self {
        Self {
            machine_name: String::new(),
            name: None,
            description: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            owners: Vec::new(),
            peers: Vec::new(),
            meta: ModuleMeta::default(),
            exclude_submodule_paths: true,
            exclude_module_paths: false,
            submodules: Vec::new(),
            parent: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept `includes: "a/**"` as well as a list; `null` is an empty list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(pattern)) => vec![pattern],
        Some(OneOrMany::Many(patterns)) => patterns,
    })
}

fn nullable_meta<'de, D>(deserializer: D) -> Result<ModuleMeta, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ModuleMeta>::deserialize(deserializer)?.unwrap_or_default())
}

impl ModuleSpec {
    /// Depth-first walk over this spec and every nested submodule spec.
    pub fn walk(&self) -> Vec<&ModuleSpec> {
        let mut out = vec![self];
        for submodule in &self.submodules {
            out.extend(submodule.walk());
        }
        out
    }

    /// Find a spec by machine name in this subtree.
    pub fn find_mut(&mut self, machine_name: &str) -> Option<&mut ModuleSpec> {
        if self.machine_name == machine_name {
            return Some(self);
        }
        self.submodules
            .iter_mut()
            .find_map(|submodule| submodule.find_mut(machine_name))
    }
}

/// A resolved module node.
///
/// Submodules are owned by their parent. `parent` is the parent's machine name, a
/// non-owning back-link.
#[derive(Debug, Clone)]
pub struct Module {
    pub machine_name: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub owners: Vec<PersonId>,
    pub peers: Vec<PersonId>,
    pub meta: ModuleMeta,
    pub exclude_submodule_paths: bool,
    pub exclude_module_paths: bool,
    pub submodules: Vec<Module>,
    pub parent: Option<String>,
    pub repo_path: PathBuf,
}

fn ids(people: &[Person]) -> Vec<PersonId> {
    people.iter().map(|person| person.id).collect()
}

fn inherit<T: Clone>(own: Vec<T>, parent: Option<&Vec<T>>) -> Vec<T> {
    match parent {
        Some(inherited) if own.is_empty() => inherited.clone(),
        _ => own,
    }
}

impl Module {
    /// Build a module tree from its spec.
    ///
    /// Empty `includes`, `excludes`, `owners` and `peers` are copied from `parent`.
    /// Submodules are built after this node's own fields are resolved, so grandchildren
    /// inherit through the chain.
    pub fn from_spec(spec: &ModuleSpec, repo_path: &Path, parent: Option<&Module>) -> Self {
        let mut module = Module {
            machine_name: spec.machine_name.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            includes: inherit(spec.includes.clone(), parent.map(|p| &p.includes)),
            excludes: inherit(spec.excludes.clone(), parent.map(|p| &p.excludes)),
            owners: inherit(ids(&spec.owners), parent.map(|p| &p.owners)),
            peers: inherit(ids(&spec.peers), parent.map(|p| &p.peers)),
            meta: spec.meta.clone(),
            exclude_submodule_paths: spec.exclude_submodule_paths,
            exclude_module_paths: spec.exclude_module_paths,
            submodules: Vec::new(),
            parent: parent.map(|p| p.machine_name.clone()),
            repo_path: repo_path.to_path_buf(),
        };

        let submodules = spec
            .submodules
            .iter()
            .map(|submodule| Module::from_spec(submodule, repo_path, Some(&module)))
            .collect();
        module.submodules = submodules;
        module
    }

    /// Label for listings: the display name, else the machine name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.machine_name)
    }

    /// Depth-first walk over this module and its submodules.
    pub fn walk(&self) -> Vec<&Module> {
        let mut out = vec![self];
        for submodule in &self.submodules {
            out.extend(submodule.walk());
        }
        out
    }

    /// Find a module by machine name in this subtree.
    pub fn find(&self, machine_name: &str) -> Option<&Module> {
        self.walk()
            .into_iter()
            .find(|module| module.machine_name == machine_name)
    }

    /// Every person id this module refers to, emeritus entries included.
    pub fn person_ids(&self) -> BTreeSet<PersonId> {
        self.owners
            .iter()
            .chain(&self.peers)
            .copied()
            .chain(
                self.meta
                    .owners_emeritus
                    .iter()
                    .chain(&self.meta.peers_emeritus)
                    .filter_map(EmeritusEntry::person_id),
            )
            .collect()
    }

    /// Concrete paths this module claims: includes minus excludes, minus every direct
    /// submodule's paths when `exclude_submodule_paths` is set.
    ///
    /// Never fails; an empty set is a validation concern.
    #[instrument(skip(self), fields(module = %self.machine_name))]
    pub fn calculate_paths(&self) -> BTreeSet<PathBuf> {
        let included = resolver::expand_all(&self.repo_path, &self.includes);
        let excluded = resolver::expand_all(&self.repo_path, &self.excludes);

        let mut paths: BTreeSet<PathBuf> = included.difference(&excluded).cloned().collect();
        if self.exclude_submodule_paths {
            for submodule in &self.submodules {
                for path in submodule.calculate_paths() {
                    paths.remove(&path);
                }
            }
        }

        debug!(
            included = included.len(),
            excluded = excluded.len(),
            claimed = paths.len(),
            "Calculated module paths"
        );
        paths
    }

    /// Check this module and all of its submodules.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate_into(&mut errors);
        errors
    }

    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        if self.machine_name.trim().is_empty() {
            errors.push(ValidationError::BlankMachineName);
        }
        if self.machine_name.chars().any(char::is_whitespace) {
            errors.push(ValidationError::WhitespaceInMachineName(
                self.machine_name.clone(),
            ));
        }
        if self.calculate_paths().is_empty() {
            errors.push(ValidationError::NoValidPaths(self.machine_name.clone()));
        }
        for submodule in &self.submodules {
            submodule.validate_into(errors);
        }
    }

    /// Serialize back into a spec. People become bare `bmo_id` references; reconciling
    /// them against the roster fills in the rest.
    pub fn serialize(&self) -> ModuleSpec {
        let mut spec = self.serialize_node();
        spec.parent = self.parent.clone();
        spec
    }

    fn serialize_node(&self) -> ModuleSpec {
        let references =
            |people: &[PersonId]| people.iter().copied().map(Person::reference).collect();
        ModuleSpec {
            machine_name: self.machine_name.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
            owners: references(&self.owners),
            peers: references(&self.peers),
            meta: self.meta.clone(),
            exclude_submodule_paths: self.exclude_submodule_paths,
            exclude_module_paths: self.exclude_module_paths,
            submodules: self
                .submodules
                .iter()
                .map(Module::serialize_node)
                .collect(),
            parent: None,
        }
    }
}
