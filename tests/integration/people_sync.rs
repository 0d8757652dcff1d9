//! People directory sync: batched lookups on load and explicit refreshes.

use super::support::{Fixture, InMemoryLookup, OfflineLookup, REGISTRY};
use modowners::error::ApiError;
use modowners::people::PersonId;
use modowners::registry::refresh_people;
use modowners::Directory;

/// Fixture with a person who was never synced, listed as a peer of `pets`.
fn with_unsynced_person() -> Fixture {
    // The registry ends with the `pets` peers list.
    let yaml = format!(
        "{}      - {{bmo_id: 7}}\n",
        REGISTRY.replace(
            "  - {bmo_id: 2, name: otis, nick: otis}\nmodules:",
            "  - {bmo_id: 2, name: otis, nick: otis}\n  - {bmo_id: 7}\nmodules:",
        )
    );
    Fixture::with_registry(&yaml)
}

#[test]
fn test_load_looks_up_everyone_in_one_batch() {
    let fixture = Fixture::new();
    let doc = fixture.registry.load().unwrap();
    let lookup = InMemoryLookup::animals();

    let mut directory = Directory::new(&doc, fixture.root());
    directory.load(false, Some(&lookup)).unwrap();

    assert_eq!(lookup.lookups.get(), 1);
    assert_eq!(
        lookup.requested.borrow()[0],
        vec![PersonId(0), PersonId(1), PersonId(2)]
    );
    let jane = directory.people().get(PersonId(0)).unwrap();
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.info, "[:jane]");
}

#[test]
fn test_load_degrades_when_directory_is_down() {
    let fixture = Fixture::new();
    let doc = fixture.registry.load().unwrap();

    let mut directory = Directory::new(&doc, fixture.root());
    directory.load(false, Some(&OfflineLookup)).unwrap();

    assert_eq!(directory.people().get(PersonId(2)).unwrap().name, "otis");
    let result = directory.query(&["felines/persian"]);
    assert_eq!(result.owners.len(), 1);
}

#[test]
fn test_incremental_refresh_only_touches_unsynced() {
    let fixture = with_unsynced_person();
    let lookup = InMemoryLookup::animals();
    lookup.set(7, "Nova Newcomer", "nova");

    let updated = refresh_people(&fixture.registry, &lookup, false, true).unwrap();
    assert_eq!(updated, 1);
    assert_eq!(lookup.requested.borrow()[0], vec![PersonId(7)]);

    let doc = fixture.registry.load().unwrap();
    let nova = doc.people.iter().find(|p| p.id == PersonId(7)).unwrap();
    assert_eq!(nova.nick, "nova");
    // Synced records are left alone by an incremental refresh.
    assert_eq!(doc.people[0].name, "jane");
    // References follow the refreshed record.
    let pets = doc.modules.iter().find(|m| m.machine_name == "pets").unwrap();
    assert!(pets.peers.iter().any(|p| p.id == PersonId(7) && p.nick == "nova"));
}

#[test]
fn test_full_refresh_touches_everyone() {
    let fixture = with_unsynced_person();
    let lookup = InMemoryLookup::animals();
    lookup.set(7, "Nova Newcomer", "nova");

    let updated = refresh_people(&fixture.registry, &lookup, true, true).unwrap();
    assert_eq!(updated, 4);

    let doc = fixture.registry.load().unwrap();
    assert_eq!(doc.people[0].name, "Jane Doe");
}

#[test]
fn test_refresh_without_changes_skips_the_directory() {
    let fixture = Fixture::new();
    let lookup = InMemoryLookup::animals();
    let updated = refresh_people(&fixture.registry, &lookup, false, true).unwrap();
    assert_eq!(updated, 0);
    assert_eq!(lookup.lookups.get(), 0);
}

#[test]
fn test_refresh_fails_when_directory_is_down() {
    let fixture = with_unsynced_person();
    let err = refresh_people(&fixture.registry, &OfflineLookup, false, true).unwrap_err();
    assert!(matches!(err, ApiError::ServiceError(_)));
}

#[test]
fn test_search() {
    let lookup = InMemoryLookup::animals();
    let found = modowners::people::PeopleLookup::search_people(&lookup, "ji").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].nick, "jill");
}
