//! Canonical people roster: one record per [`PersonId`], addressed through a position index.

use crate::error::ApiError;
use crate::people::lookup::PeopleLookup;
use crate::people::{Person, PersonId, Profile};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// What reconciling a reference did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The reference already carried the canonical record.
    Unchanged,
    /// The reference was rewritten to the canonical record.
    Replaced,
    /// The person was unknown and became a new canonical record.
    Registered,
}

/// Canonical store of person records.
#[derive(Debug, Clone, Default)]
pub struct People {
    people: Vec<Person>,
    by_id: HashMap<PersonId, usize>,
    profiles: HashMap<PersonId, Profile>,
}

impl People {
    /// Build the roster from stored records, merging in directory profiles.
    ///
    /// A record with a profile takes the profile's nick, name and info. A record without
    /// one keeps its stored values. Repeated ids keep the first record. Profiles are kept
    /// so people registered later through [`People::reconcile`] are synced as well.
    pub fn new(records: Vec<Person>, profiles: &HashMap<PersonId, Profile>) -> Self {
        debug!(count = records.len(), "Initializing people roster");
        let mut roster = Self {
            profiles: profiles.clone(),
            ..Self::default()
        };
        for mut person in records {
            if roster.by_id.contains_key(&person.id) {
                warn!(bmo_id = %person.id, "Duplicate person record ignored");
                continue;
            }
            if let Some(profile) = profiles.get(&person.id) {
                person.apply_profile(profile);
            }
            roster.by_id.insert(person.id, roster.people.len());
            roster.people.push(person);
        }
        roster
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.by_id.get(&id).map(|&position| &self.people[position])
    }

    pub fn position(&self, id: PersonId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn records(&self) -> &[Person] {
        &self.people
    }

    pub fn into_records(self) -> Vec<Person> {
        self.people
    }

    pub fn ids(&self) -> Vec<PersonId> {
        self.people.iter().map(|p| p.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Append a new canonical record, or return the position of the existing one.
    pub fn insert(&mut self, person: Person) -> usize {
        if let Some(position) = self.position(person.id) {
            return position;
        }
        self.people.push(person);
        self.refresh_index();
        self.people.len() - 1
    }

    /// Resolve ids to records, skipping ids the roster does not know.
    pub fn resolve<'b>(&self, ids: impl IntoIterator<Item = &'b PersonId>) -> Vec<&Person> {
        ids.into_iter().filter_map(|id| self.get(*id)).collect()
    }

    /// Sort records by nick, case-insensitively, keeping the index consistent.
    pub fn sort_by_nick(&mut self) {
        self.people.sort_by_key(|p| p.nick.to_lowercase());
        self.refresh_index();
    }

    fn refresh_index(&mut self) {
        self.by_id = self
            .people
            .iter()
            .enumerate()
            .map(|(position, person)| (person.id, position))
            .collect();
    }

    /// Point the reference at `refs[ref_index]` to the canonical record for its id.
    ///
    /// Unknown people are appended to the roster first. The reference keeps its value unless
    /// the roster holds a directory profile for it.
    /// Reconciling a reference that already holds the canonical record changes nothing.
    pub fn reconcile_reference(
        &mut self,
        refs: &mut [Person],
        ref_index: usize,
        field: &str,
    ) -> ReconcileOutcome {
        match refs.get_mut(ref_index) {
            Some(candidate) => self.reconcile(candidate, field),
            None => {
                warn!(field, ref_index, "Reference index out of range");
                ReconcileOutcome::Unchanged
            }
        }
    }

    /// Reconcile a single reference in place.
    pub fn reconcile(&mut self, candidate: &mut Person, field: &str) -> ReconcileOutcome {
        match self.get(candidate.id) {
            Some(canonical) if canonical.same_record(candidate) => ReconcileOutcome::Unchanged,
            Some(canonical) => {
                debug!(bmo_id = %candidate.id, field, "Replacing reference with canonical record");
                *candidate = canonical.clone();
                ReconcileOutcome::Replaced
            }
            None => {
                debug!(bmo_id = %candidate.id, field, "Registering new person from reference");
                if let Some(profile) = self.profiles.get(&candidate.id) {
                    candidate.apply_profile(profile);
                }
                self.insert(candidate.clone());
                ReconcileOutcome::Registered
            }
        }
    }

    /// Re-sync records from the people directory.
    ///
    /// With `full` every record is overwritten from its profile. Otherwise only records that
    /// were never synced (no nick) are looked up; synced records stay as they are even if the
    /// directory has changed since. Returns the number of records updated.
    #[instrument(skip(self, lookup), fields(people = self.people.len()))]
    pub fn refresh(&mut self, full: bool, lookup: &dyn PeopleLookup) -> Result<usize, ApiError> {
        let ids: Vec<PersonId> = self
            .people
            .iter()
            .filter(|p| full || p.needs_sync())
            .map(|p| p.id)
            .collect();

        if ids.is_empty() {
            debug!("No people need a directory sync");
            return Ok(0);
        }

        let profiles = lookup.lookup_people(&ids)?;
        let mut updated = 0;
        for id in &ids {
            let Some(profile) = profiles.get(id) else {
                warn!(bmo_id = %id, "No directory profile found");
                continue;
            };
            if let Some(position) = self.position(*id) {
                self.people[position].apply_profile(profile);
                updated += 1;
            }
        }

        info!(requested = ids.len(), updated, full, "People refreshed");
        Ok(updated)
    }
}
