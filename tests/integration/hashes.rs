//! Stored hashes against the registry and its rendered export.

use super::support::{Fixture, InMemoryLookup};
use modowners::config::ExportSettings;
use modowners::registry::{check_hashes, clean};
use std::fs;

fn categories(fixture: &Fixture) -> Vec<&'static str> {
    let doc = fixture.registry.load().unwrap();
    check_hashes(&doc, fixture.root())
        .unwrap()
        .into_iter()
        .map(|mismatch| mismatch.category)
        .collect()
}

#[test]
fn test_unhashed_registry_mismatches_both() {
    let fixture = Fixture::new();
    assert_eq!(categories(&fixture), vec!["config", "export"]);
}

#[test]
fn test_clean_makes_hashes_current() {
    let fixture = Fixture::new();
    clean(
        &fixture.registry,
        &InMemoryLookup::animals(),
        &ExportSettings::default(),
        true,
    )
    .unwrap();
    assert!(categories(&fixture).is_empty());
}

#[test]
fn test_hand_edits_are_detected() {
    let fixture = Fixture::new();
    clean(
        &fixture.registry,
        &InMemoryLookup::animals(),
        &ExportSettings::default(),
        true,
    )
    .unwrap();

    fs::write(fixture.root().join("mots.rst"), "edited by hand\n").unwrap();
    assert_eq!(categories(&fixture), vec!["export"]);

    let mut doc = fixture.registry.load().unwrap();
    doc.modules[0].description = Some("Farm and household animals".to_string());
    let stored = doc.hashes.clone();
    fixture.registry.write(&mut doc, stored).unwrap();
    assert_eq!(categories(&fixture), vec!["config", "export"]);
}

#[test]
fn test_rewrite_without_changes_keeps_config_hash() {
    let fixture = Fixture::new();
    clean(
        &fixture.registry,
        &InMemoryLookup::animals(),
        &ExportSettings::default(),
        true,
    )
    .unwrap();

    let mut doc = fixture.registry.load().unwrap();
    let stored = doc.hashes.clone();
    fixture.registry.write(&mut doc, stored).unwrap();
    assert!(categories(&fixture).is_empty());
}

#[test]
fn test_mismatch_message() {
    let fixture = Fixture::new();
    let doc = fixture.registry.load().unwrap();
    let mismatches = check_hashes(&doc, fixture.root()).unwrap();
    let message = mismatches[0].to_string();
    assert!(message.starts_with("Mismatch in config hash detected: "));
    assert!(message.ends_with("does not match none. config file is out of date."));
}
