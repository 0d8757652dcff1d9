//! Registry validation against the animals repository.

use super::support::{Fixture, REGISTRY};
use modowners::module::ValidationError;
use modowners::registry::validate;

fn messages(fixture: &Fixture) -> Vec<String> {
    let value = fixture.registry.read_value().unwrap();
    match validate(&value, fixture.root()) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    }
}

#[test]
fn test_fixture_registry_is_valid() {
    let fixture = Fixture::new();
    assert!(messages(&fixture).is_empty());
}

#[test]
fn test_missing_top_level_keys() {
    let fixture = Fixture::with_registry("repo: test_repo\nmodules: []\n");
    let value = fixture.registry.read_value().unwrap();
    assert_eq!(
        validate(&value, fixture.root()),
        Err(vec![ValidationError::MissingKeys(vec![
            "created_at".to_string(),
            "updated_at".to_string(),
        ])])
    );
}

#[test]
fn test_duplicate_names_across_levels() {
    let yaml = REGISTRY.replace("machine_name: predators", "machine_name: pets");
    let fixture = Fixture::with_registry(&yaml);
    assert_eq!(
        messages(&fixture),
        vec!["Duplicate machine name(s) found: pets"]
    );
}

#[test]
fn test_module_problems_are_all_reported() {
    let yaml = REGISTRY
        .replace("machine_name: pets", "machine_name: house pets")
        .replace(
            "          - canines/hyena\n          - felines/tiger\n          - felines/cheetah\n          - birds/**/*\n",
            "          - felines/tiger\n",
        );
    let fixture = Fixture::with_registry(&yaml);
    assert_eq!(
        messages(&fixture),
        vec![
            "No valid paths were found in predators.",
            "Machine name house pets contains white space.",
        ]
    );
}

#[test]
fn test_invalid_module_shape() {
    let fixture = Fixture::with_registry(
        "repo: r\ncreated_at: x\nupdated_at: null\nmodules:\n  - machine_name: [not, a, string]\n",
    );
    let value = fixture.registry.read_value().unwrap();
    let errors = validate(&value, fixture.root()).unwrap_err();
    assert!(matches!(errors[0], ValidationError::InvalidModules(_)));
}
