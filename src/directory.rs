//! Directory facade
//!
//! Ties a loaded registry document to the repository on disk: the resolved module tree,
//! the people roster and the path index built from both.

use crate::error::StorageError;
use crate::index::{DirectoryIndex, IndexBuilder};
use crate::module::Module;
use crate::people::lookup::lookup_or_empty;
use crate::people::{People, PeopleLookup, Person, PersonId};
use crate::query::{self, QueryResult};
use crate::registry::RegistryDocument;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

pub struct Directory {
    repo_path: PathBuf,
    repo: String,
    modules: Vec<Module>,
    people: People,
    records: Vec<Person>,
    referenced: Vec<PersonId>,
    index: DirectoryIndex,
}

impl Directory {
    /// Resolve the module tree. The index stays empty until [`Directory::load`].
    pub fn new(doc: &RegistryDocument, repo_path: &Path) -> Self {
        let modules = doc
            .modules
            .iter()
            .map(|spec| Module::from_spec(spec, repo_path, None))
            .collect();
        Self {
            repo_path: repo_path.to_path_buf(),
            repo: doc.repo.clone(),
            modules,
            people: People::new(doc.people.clone(), &HashMap::new()),
            records: doc.people.clone(),
            referenced: doc.referenced_person_ids(),
            index: DirectoryIndex::default(),
        }
    }

    /// Build the path index and refresh people from the directory service.
    ///
    /// All person ids, including people only named in modules, are looked up in one batch.
    /// A lookup failure, or no lookup at all, leaves the stored person records in place.
    #[instrument(skip(self, lookup), fields(repo = %self.repo_path.display()))]
    pub fn load(
        &mut self,
        full_paths: bool,
        lookup: Option<&dyn PeopleLookup>,
    ) -> Result<(), StorageError> {
        self.index = IndexBuilder::new(self.repo_path.clone())
            .with_full_paths(full_paths)
            .build(&self.modules)?;

        let profiles = lookup_or_empty(lookup, &self.referenced);
        let mut people = People::new(self.records.clone(), &profiles);
        for id in &self.referenced {
            if !people.contains(*id) {
                people.reconcile(&mut Person::reference(*id), "modules");
            }
        }
        self.people = people;
        Ok(())
    }

    pub fn query<S: AsRef<str>>(&self, paths: &[S]) -> QueryResult {
        query::query(&self.index, &self.repo_path, paths)
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Repository name as recorded in the document
    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Find a module or submodule by machine name.
    pub fn module(&self, machine_name: &str) -> Option<&Module> {
        self.modules
            .iter()
            .find_map(|module| module.find(machine_name))
    }

    pub fn people(&self) -> &People {
        &self.people
    }

    pub fn index(&self) -> &DirectoryIndex {
        &self.index
    }

    /// Nicks for `ids`, falling back to the person label when a record has no nick.
    pub fn nicks<'a>(&self, ids: impl IntoIterator<Item = &'a PersonId>) -> Vec<String> {
        ids.into_iter()
            .map(|id| match self.people.get(*id) {
                Some(person) if !person.nick.is_empty() => person.nick.clone(),
                Some(person) => person.label(),
                None => format!("#{}", id),
            })
            .collect()
    }
}
