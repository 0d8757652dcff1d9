//! Path queries over the animals repository.

use super::support::Fixture;
use modowners::cli::format_query_text;
use modowners::people::PersonId;
use modowners::QueryResult;
use std::collections::BTreeSet;
use std::fs;

fn names(result: &QueryResult, path: &str) -> Vec<String> {
    result.path_map[path]
        .iter()
        .map(|module| module.machine_name.clone())
        .collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_query_resolves_and_rejects() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let result = directory.query(&[
        "canines/chihuahuas/apple_head",
        "birds/parrot",
        "felines/persian",
        "felines/maine_coon",
    ]);

    assert_eq!(result.path_map.len(), 3);
    for path in ["canines/chihuahuas/apple_head", "birds/parrot", "felines/persian"] {
        assert_eq!(names(&result, path), vec!["pets"]);
    }
    assert_eq!(
        result.paths,
        set(&["canines/chihuahuas/apple_head", "birds/parrot", "felines/persian"])
    );
    assert_eq!(result.owners, BTreeSet::from([PersonId(2)]));
    assert_eq!(result.peers, BTreeSet::from([PersonId(1)]));
    assert_eq!(result.rejected_paths, set(&["felines/maine_coon"]));
}

#[test]
fn test_query_normalizes_input() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let result = directory.query(&["./bovines/cow", "pigs/wild_boar/"]);
    assert_eq!(result.paths, set(&["bovines/cow", "pigs/wild_boar"]));
    assert_eq!(names(&result, "bovines/cow"), vec!["domesticated_animals"]);
    assert!(result.rejected_paths.is_empty());
}

#[test]
fn test_empty_query_path_is_the_repository_root() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let result = directory.query(&[""]);
    assert!(result.rejected_paths.is_empty());
    assert_eq!(result.paths, set(&[""]));
    assert!(result.path_map[""].is_empty());
}

#[test]
fn test_query_keeps_surrounding_whitespace() {
    let fixture = Fixture::new();
    fs::write(fixture.root().join("birds/ nest "), "").unwrap();
    let directory = fixture.directory(false);

    let result = directory.query(&["birds/ nest ", "  pigs/wild_boar  "]);
    assert_eq!(result.paths, set(&["birds/ nest "]));
    assert_eq!(result.rejected_paths, set(&["  pigs/wild_boar  "]));
}

#[test]
fn test_unclaimed_existing_path_maps_to_nothing() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let result = directory.query(&["marsupials/koala"]);
    assert!(result.path_map["marsupials/koala"].is_empty());
    assert!(result.rejected_paths.is_empty());
    assert!(result.owners.is_empty());
}

#[test]
fn test_merging_results() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let first = directory.query(&[
        "canines/chihuahuas/apple_head",
        "birds/parrot",
        "felines/maine_coon",
    ]);
    let second = directory.query(&["felines/persian", "felines/maine_coon"]);
    let merged = first + second;

    assert_eq!(
        merged.paths,
        set(&["canines/chihuahuas/apple_head", "birds/parrot", "felines/persian"])
    );
    assert_eq!(merged.owners, BTreeSet::from([PersonId(2)]));
    assert_eq!(merged.peers, BTreeSet::from([PersonId(1)]));
    assert_eq!(merged.rejected_paths, set(&["felines/maine_coon"]));
}

#[test]
fn test_merging_with_empty_result() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let result = directory.query(&["birds/parrot", "felines/maine_coon"]);
    let merged = result.clone() + QueryResult::default();
    assert_eq!(merged, result);

    assert!(QueryResult::default().is_empty());
    assert!((QueryResult::default() + QueryResult::default()).is_empty());
    assert!(!merged.is_empty());
}

#[test]
fn test_text_lines() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let result = directory.query(&["canines/hyena", "bovines/cow", "marsupials/koala"]);
    assert_eq!(
        format_query_text(&directory, &result),
        "bovines/cow:domesticated_animals:jane\ncanines/hyena:predators:jill\nmarsupials/koala::"
    );
}
