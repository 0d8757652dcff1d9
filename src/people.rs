//! People directory
//!
//! Canonical person records keyed by their external directory identifier. Modules refer to
//! people by [`PersonId`]; the [`People`] roster owns the one record per id that every
//! owner, peer and emeritus reference resolves to.

use crate::utils::parse_real_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

pub mod lookup;
pub mod roster;

pub use lookup::{BugzillaClient, PeopleLookup};
pub use roster::{People, ReconcileOutcome};

/// External directory identifier of a person (a Bugzilla user id).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PersonId {
    fn from(id: u64) -> Self {
        PersonId(id)
    }
}

/// A person record as stored in the registry document.
///
/// Equality and hashing use the identifier only: two records with the same `bmo_id` are
/// the same person even when one of them is stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "bmo_id")]
    pub id: PersonId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nick: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: &str, nick: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            nick: nick.to_string(),
            info: String::new(),
        }
    }

    /// A bare reference carrying only the identifier.
    pub fn reference(id: PersonId) -> Self {
        Self {
            id,
            name: String::new(),
            nick: String::new(),
            info: String::new(),
        }
    }

    /// Records that never went through a directory sync have no nick.
    pub fn needs_sync(&self) -> bool {
        self.nick.is_empty()
    }

    /// Field-by-field comparison, unlike `==` which compares identity only.
    pub fn same_record(&self, other: &Person) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.nick == other.nick
            && self.info == other.info
    }

    /// Overwrite the synced fields from a directory profile. The profile is authoritative.
    pub fn apply_profile(&mut self, profile: &Profile) {
        let parsed = parse_real_name(&profile.real_name);
        self.nick = profile.nick.clone();
        self.name = parsed.name.unwrap_or_default();
        self.info = parsed.info.unwrap_or_default();
    }

    /// Human label: `"Name (nick)"`, falling back to whichever part exists.
    pub fn label(&self) -> String {
        match (self.name.is_empty(), self.nick.is_empty()) {
            (false, false) => format!("{} ({})", self.name, self.nick),
            (false, true) => self.name.clone(),
            (true, false) => self.nick.clone(),
            (true, true) => format!("#{}", self.id),
        }
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Profile data returned by the external people directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: PersonId,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub nick: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}
