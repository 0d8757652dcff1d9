//! Typed shape of the registry document.

use crate::module::{EmeritusEntry, ModuleSpec};
use crate::people::{Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Stored content hashes. `None` until the first clean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashes {
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default)]
    pub export: Option<String>,
}

/// Where and how the rendered documentation is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Relative to the repository root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub searchfox_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub repo: String,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub hashes: Hashes,

    #[serde(default, deserialize_with = "nullable")]
    pub export: ExportConfig,

    #[serde(default, deserialize_with = "nullable")]
    pub people: Vec<Person>,

    #[serde(default, deserialize_with = "nullable")]
    pub modules: Vec<ModuleSpec>,

    /// Top-level keys this version does not know about, kept on rewrite
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RegistryDocument {
    /// A fresh, empty document for the repository named `repo`.
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            updated_at: None,
            hashes: Hashes::default(),
            export: ExportConfig::default(),
            people: Vec::new(),
            modules: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Every module spec, submodules included, depth first.
    pub fn module_specs(&self) -> Vec<&ModuleSpec> {
        self.modules.iter().flat_map(ModuleSpec::walk).collect()
    }

    /// Ids of every person in the people list.
    pub fn person_ids(&self) -> Vec<PersonId> {
        self.people.iter().map(|person| person.id).collect()
    }

    /// Ids of the people list followed by ids referenced only from modules, without repeats.
    pub fn referenced_person_ids(&self) -> Vec<PersonId> {
        let mut ids = self.person_ids();
        for spec in self.module_specs() {
            let emeritus = spec
                .meta
                .owners_emeritus
                .iter()
                .chain(&spec.meta.peers_emeritus)
                .filter_map(EmeritusEntry::person_id);
            let referenced = spec.owners.iter().chain(&spec.peers).map(|p| p.id);
            for id in referenced.chain(emeritus) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}
