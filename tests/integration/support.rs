//! Shared fixtures: the animals repository and an in-memory people directory.

use modowners::error::ApiError;
use modowners::people::{PeopleLookup, PersonId, Profile};
use modowners::registry::FileRegistry;
use modowners::Directory;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DIRS: &[&str] = &[
    ".hg",
    "canines",
    "canines/chihuahuas",
    "felines",
    "bovines",
    "pigs",
    "marsupials",
    "birds",
];

const FILES: &[&str] = &[
    "canines/chihuahuas/apple_head",
    "canines/beagle",
    "canines/corgy",
    "canines/red_fox",
    "canines/hyena",
    "felines/persian",
    "felines/cheetah",
    "bovines/cow",
    "bovines/sheep",
    "pigs/wild_boar",
    "pigs/miniature_pig",
    "marsupials/kangaroo",
    "marsupials/koala",
    "birds/parrot",
    "birds/eagle",
    "mots.rst",
];

pub const REGISTRY: &str = r#"repo: test_repo
created_at: "2021-09-10 12:53:22.383393"
updated_at: "2021-09-10 12:53:22.383393"
export:
  format: rst
  path: mots.rst
people:
  - {bmo_id: 0, name: jane, nick: jane}
  - {bmo_id: 1, name: jill, nick: jill}
  - {bmo_id: 2, name: otis, nick: otis}
modules:
  - machine_name: domesticated_animals
    exclude_submodule_paths: true
    exclude_module_paths: true
    includes:
      - canines/**/*
      - felines/**/*
      - bovines/**/*
      - birds/**/*
      - pigs/**/*
    excludes:
      - canines/red_fox
    owners:
      - {bmo_id: 0, name: jane, nick: jane}
    peers:
      - {bmo_id: 1, name: jill, nick: jill}
    meta:
      peers_emeritus:
        - {bmo_id: 2, name: otis, nick: otis}
    submodules:
      - machine_name: predators
        includes:
          - canines/hyena
          - felines/tiger
          - felines/cheetah
          - birds/**/*
        excludes:
          - birds/parrot
        owners:
          - {bmo_id: 1, name: jill, nick: jill}
        meta:
          owners_emeritus:
            - {bmo_id: 2, name: otis, nick: otis}
  - machine_name: pets
    includes:
      - canines/**/*
      - felines/**/*
      - birds/**/*
    excludes:
      - canines/red_fox
      - canines/hyena
      - felines/cheetah
      - birds/eagle
    owners:
      - {bmo_id: 2, name: otis, nick: otis}
    peers:
      - {bmo_id: 1, name: jill, nick: jill}
"#;

/// A temporary repository laid out for the animal modules, with `mots.yml` at its root.
pub struct Fixture {
    _temp: TempDir,
    pub registry: FileRegistry,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_registry(REGISTRY)
    }

    pub fn with_registry(yaml: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("test_repo");
        fs::create_dir(&root).unwrap();
        for dir in DIRS {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        for file in FILES {
            fs::write(root.join(file), "").unwrap();
        }
        fs::write(root.join("mots.yml"), yaml).unwrap();
        let registry = FileRegistry::new(root.join("mots.yml")).unwrap();
        Self {
            _temp: temp,
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        self.registry.repo_path()
    }

    /// Directory with its index built and no people directory.
    pub fn directory(&self, full_paths: bool) -> Directory {
        let doc = self.registry.load().unwrap();
        let mut directory = Directory::new(&doc, self.root());
        directory.load(full_paths, None).unwrap();
        directory
    }
}

/// People directory backed by a map. Counts batched lookups.
#[derive(Default)]
pub struct InMemoryLookup {
    profiles: RefCell<HashMap<PersonId, Profile>>,
    pub lookups: Cell<usize>,
    pub requested: RefCell<Vec<Vec<PersonId>>>,
}

impl InMemoryLookup {
    pub fn new(profiles: &[(u64, &str, &str)]) -> Self {
        let lookup = Self::default();
        for (id, real_name, nick) in profiles {
            lookup.set(*id, real_name, nick);
        }
        lookup
    }

    pub fn set(&self, id: u64, real_name: &str, nick: &str) {
        self.profiles.borrow_mut().insert(
            PersonId(id),
            Profile {
                id: PersonId(id),
                real_name: real_name.to_string(),
                nick: nick.to_string(),
                name: format!("{}@example.com", nick),
                email: Some(format!("{}@example.com", nick)),
            },
        );
    }

    /// Profiles for the three fixture people, with richer real names.
    pub fn animals() -> Self {
        Self::new(&[
            (0, "Jane Doe [:jane]", "jane"),
            (1, "Jill Hill (she/her)", "jill"),
            (2, "Otis Redding", "otis"),
        ])
    }
}

impl PeopleLookup for InMemoryLookup {
    fn lookup_people(&self, ids: &[PersonId]) -> Result<HashMap<PersonId, Profile>, ApiError> {
        self.lookups.set(self.lookups.get() + 1);
        self.requested.borrow_mut().push(ids.to_vec());
        let profiles = self.profiles.borrow();
        Ok(ids
            .iter()
            .filter_map(|id| profiles.get(id).map(|profile| (*id, profile.clone())))
            .collect())
    }

    fn search_people(&self, query: &str) -> Result<Vec<Profile>, ApiError> {
        let query = query.to_lowercase();
        let mut found: Vec<Profile> = self
            .profiles
            .borrow()
            .values()
            .filter(|p| p.nick.contains(&query) || p.real_name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }
}

/// A directory that is always down.
pub struct OfflineLookup;

impl PeopleLookup for OfflineLookup {
    fn lookup_people(&self, _: &[PersonId]) -> Result<HashMap<PersonId, Profile>, ApiError> {
        Err(ApiError::ServiceError("Connection error: offline".to_string()))
    }

    fn search_people(&self, _: &str) -> Result<Vec<Profile>, ApiError> {
        Err(ApiError::ServiceError("Connection error: offline".to_string()))
    }
}
