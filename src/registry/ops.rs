//! Maintenance operations on the registry document

use crate::config::ExportSettings;
use crate::directory::Directory;
use crate::error::ApiError;
use crate::export::{ExportFormat, Exporter};
use crate::module::{EmeritusEntry, Module, ModuleSpec};
use crate::people::{People, PeopleLookup, Person, ReconcileOutcome};
use crate::registry::hashes::calculate_hashes;
use crate::registry::store::{write_atomic, FileRegistry};
use crate::registry::{Hashes, RegistryDocument};
use crate::utils::generate_machine_readable_name;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Counts of what a reconcile pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileCounts {
    pub replaced: usize,
    pub registered: usize,
}

impl ReconcileCounts {
    fn record(&mut self, outcome: ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Unchanged => {}
            ReconcileOutcome::Replaced => self.replaced += 1,
            ReconcileOutcome::Registered => self.registered += 1,
        }
    }
}

fn reconcile_list(
    roster: &mut People,
    refs: &mut [Person],
    field: &str,
    counts: &mut ReconcileCounts,
) {
    for index in 0..refs.len() {
        counts.record(roster.reconcile_reference(refs, index, field));
    }
}

/// Point every owner, peer and emeritus reference in `spec` and its submodules at the
/// canonical roster record, registering people the roster does not know yet.
pub fn reconcile_module_references(
    roster: &mut People,
    spec: &mut ModuleSpec,
    counts: &mut ReconcileCounts,
) {
    reconcile_list(roster, &mut spec.owners, "owners", counts);
    reconcile_list(roster, &mut spec.peers, "peers", counts);
    for (field, entries) in [
        ("owners_emeritus", &mut spec.meta.owners_emeritus),
        ("peers_emeritus", &mut spec.meta.peers_emeritus),
    ] {
        for entry in entries.iter_mut() {
            if let EmeritusEntry::Person(person) = entry {
                counts.record(roster.reconcile(person, field));
            }
        }
    }
    for submodule in &mut spec.submodules {
        reconcile_module_references(roster, submodule, counts);
    }
}

fn fill_machine_names(spec: &mut ModuleSpec) -> usize {
    let mut generated = 0;
    if spec.machine_name.trim().is_empty() {
        if let Some(name) = &spec.name {
            spec.machine_name = generate_machine_readable_name(name);
            debug!(machine_name = %spec.machine_name, "Generated machine name");
            generated += 1;
        }
    }
    for submodule in &mut spec.submodules {
        generated += fill_machine_names(submodule);
    }
    generated
}

fn sort_key(spec: &ModuleSpec) -> String {
    spec.name.clone().unwrap_or_else(|| spec.machine_name.clone())
}

fn sort_submodules(spec: &mut ModuleSpec) {
    spec.submodules.sort_by_key(sort_key);
    for submodule in &mut spec.submodules {
        sort_submodules(submodule);
    }
}

/// Add a module to the registry, at the top level or under `parent`.
///
/// The spec is normalised through a [`Module`] round trip, owner and peer references are
/// reconciled against the people list, and a missing machine name is generated from the
/// display name.
#[instrument(skip(registry, new_module), fields(machine_name = %new_module.machine_name))]
pub fn add(
    registry: &FileRegistry,
    new_module: ModuleSpec,
    parent: Option<&str>,
    write: bool,
) -> Result<RegistryDocument, ApiError> {
    let mut doc = registry.load()?;

    let mut serialized = Module::from_spec(&new_module, registry.repo_path(), None).serialize();
    serialized.parent = None;
    // Serialized people are bare ids; keep the caller's records for reconciling.
    serialized.owners = new_module.owners.clone();
    serialized.peers = new_module.peers.clone();
    fill_machine_names(&mut serialized);

    let mut roster = People::new(std::mem::take(&mut doc.people), &HashMap::new());
    let mut counts = ReconcileCounts::default();
    reconcile_module_references(&mut roster, &mut serialized, &mut counts);
    doc.people = roster.into_records();

    match parent {
        Some(parent) => {
            let target = doc
                .modules
                .iter_mut()
                .find_map(|module| module.find_mut(parent))
                .ok_or_else(|| ApiError::ModuleNotFound(parent.to_string()))?;
            target.submodules.push(serialized);
        }
        None => doc.modules.push(serialized),
    }

    if write {
        registry.write(&mut doc, Hashes::default())?;
    }
    info!(parent, registered = counts.registered, "Module added");
    Ok(doc)
}

/// What [`clean`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub machine_names_generated: usize,
    pub references: ReconcileCounts,
    pub people: usize,
    pub export_written: Option<PathBuf>,
    pub hashes: Option<Hashes>,
}

/// Re-sync people, normalise references and ordering, and refresh hashes.
///
/// The people directory is required here: lookup failures are returned, not degraded.
/// With `write`, the export is rendered (and written when the registry names a path) and
/// the document is stored with fresh hashes.
#[instrument(skip(registry, lookup, settings), fields(path = %registry.path().display()))]
pub fn clean(
    registry: &FileRegistry,
    lookup: &dyn PeopleLookup,
    settings: &ExportSettings,
    write: bool,
) -> Result<(RegistryDocument, CleanReport), ApiError> {
    let mut doc = registry.load()?;
    let mut report = CleanReport::default();

    let profiles = lookup.lookup_people(&doc.referenced_person_ids())?;
    let mut roster = People::new(std::mem::take(&mut doc.people), &profiles);

    for spec in &mut doc.modules {
        report.machine_names_generated += fill_machine_names(spec);
        reconcile_module_references(&mut roster, spec, &mut report.references);
        sort_submodules(spec);
    }
    doc.modules.sort_by(|a, b| a.machine_name.cmp(&b.machine_name));

    roster.sort_by_nick();
    report.people = roster.len();
    doc.people = roster.into_records();

    if write {
        let export = match doc.export.format.as_deref() {
            Some(format) => {
                let format: ExportFormat = format.parse()?;
                let directory = Directory::new(&doc, registry.repo_path());
                let rendered = Exporter::new(&directory, &doc.export, settings).render(format);
                if let Some(path) = &doc.export.path {
                    let full = registry.repo_path().join(path);
                    write_atomic(&full, rendered.as_bytes())?;
                    report.export_written = Some(full);
                }
                Some(rendered)
            }
            None => None,
        };

        let hashes = calculate_hashes(&doc, export.as_deref().map(str::as_bytes))?;
        registry.write(&mut doc, hashes.clone())?;
        report.hashes = Some(hashes);
    }

    info!(
        people = report.people,
        replaced = report.references.replaced,
        registered = report.references.registered,
        generated = report.machine_names_generated,
        write,
        "Registry cleaned"
    );
    Ok((doc, report))
}

/// Re-sync people from the directory and propagate the new records to every module
/// reference. Incremental unless `full`. Stored hashes are left alone; `clean` refreshes
/// them.
#[instrument(skip(registry, lookup))]
pub fn refresh_people(
    registry: &FileRegistry,
    lookup: &dyn PeopleLookup,
    full: bool,
    write: bool,
) -> Result<usize, ApiError> {
    let mut doc = registry.load()?;
    let mut roster = People::new(std::mem::take(&mut doc.people), &HashMap::new());

    // Register people referenced only from modules so they are synced too.
    let mut counts = ReconcileCounts::default();
    for spec in &mut doc.modules {
        reconcile_module_references(&mut roster, spec, &mut counts);
    }
    let updated = roster.refresh(full, lookup)?;
    for spec in &mut doc.modules {
        reconcile_module_references(&mut roster, spec, &mut counts);
    }
    doc.people = roster.into_records();

    if write {
        let hashes = doc.hashes.clone();
        registry.write(&mut doc, hashes)?;
    }
    Ok(updated)
}
