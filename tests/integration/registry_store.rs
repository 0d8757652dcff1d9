//! Registry file lifecycle: init, load, write.

use super::support::{Fixture, REGISTRY};
use modowners::error::ApiError;
use modowners::module::ModuleSpec;
use modowners::registry::{add, FileRegistry, Hashes};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_init_creates_empty_registry_once() {
    let temp_dir = TempDir::new().unwrap();
    let repo = temp_dir.path().join("gecko");
    fs::create_dir(&repo).unwrap();
    let registry = FileRegistry::new(repo.join("mots.yml")).unwrap();

    let doc = registry.init().unwrap();
    assert_eq!(doc.repo, "gecko");
    assert!(doc.created_at.is_some());
    assert!(doc.updated_at.is_none());

    let loaded = registry.load().unwrap();
    assert!(loaded.modules.is_empty());
    assert!(loaded.people.is_empty());
    assert_eq!(loaded.hashes, Hashes::default());

    let err = registry.init().unwrap_err();
    assert!(matches!(err, ApiError::RegistryExists(path) if path == registry.path()));
}

#[test]
fn test_write_stamps_and_keeps_unknown_keys() {
    let fixture = Fixture::with_registry(&format!("{}notes: keep me\n", REGISTRY));
    let mut doc = fixture.registry.load().unwrap();
    let hashes = Hashes {
        config: Some("abc".to_string()),
        export: None,
    };
    fixture.registry.write(&mut doc, hashes.clone()).unwrap();

    let value = fixture.registry.read_value().unwrap();
    assert_eq!(value["notes"].as_str(), Some("keep me"));
    assert_ne!(
        value["updated_at"].as_str(),
        Some("2021-09-10 12:53:22.383393")
    );
    assert_eq!(fixture.registry.load().unwrap().hashes, hashes);
    assert!(!fixture.root().join(".mots.yml.tmp").exists());
}

#[test]
fn test_load_reports_parse_errors() {
    let fixture = Fixture::with_registry("repo: [unterminated\n");
    let err = fixture.registry.load().unwrap_err();
    assert!(err.to_string().contains("Failed to parse registry document"));
}

#[test]
fn test_add_top_level_and_submodule() {
    let fixture = Fixture::new();
    let spec = ModuleSpec {
        name: Some("Marsupials".to_string()),
        includes: vec!["marsupials/*".to_string()],
        owners: vec![modowners::people::Person::reference(modowners::people::PersonId(2))],
        ..ModuleSpec::default()
    };
    add(&fixture.registry, spec, None, true).unwrap();

    let sub = ModuleSpec {
        machine_name: "koalas".to_string(),
        includes: vec!["marsupials/koala".to_string()],
        ..ModuleSpec::default()
    };
    add(&fixture.registry, sub, Some("marsupials"), true).unwrap();

    let doc = fixture.registry.load().unwrap();
    let marsupials = doc
        .modules
        .iter()
        .find(|m| m.machine_name == "marsupials")
        .unwrap();
    assert_eq!(marsupials.owners[0].nick, "otis");
    assert_eq!(marsupials.submodules[0].machine_name, "koalas");
    assert!(marsupials.submodules[0].parent.is_none());
    assert_eq!(doc.hashes, Hashes::default());

    let directory = fixture.directory(false);
    assert_eq!(
        directory.index().machine_names(&fixture.root().join("marsupials/koala")),
        vec!["koalas"]
    );
    assert_eq!(
        directory.index().machine_names(&fixture.root().join("marsupials/kangaroo")),
        vec!["marsupials"]
    );
}

#[test]
fn test_add_under_unknown_parent() {
    let fixture = Fixture::new();
    let spec = ModuleSpec {
        machine_name: "orphans".to_string(),
        includes: vec!["pigs/*".to_string()],
        ..ModuleSpec::default()
    };
    let err = add(&fixture.registry, spec, Some("reptiles"), true).unwrap_err();
    assert!(matches!(err, ApiError::ModuleNotFound(name) if name == "reptiles"));
}
