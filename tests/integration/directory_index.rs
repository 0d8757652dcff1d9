//! Index construction over the animals repository.

use super::support::Fixture;
use std::fs;

const EXPECTED: &[(&str, &[&str])] = &[
    ("birds", &[]),
    ("birds/eagle", &["predators"]),
    ("birds/parrot", &["pets"]),
    ("bovines", &[]),
    ("bovines/cow", &["domesticated_animals"]),
    ("bovines/sheep", &["domesticated_animals"]),
    ("canines", &[]),
    ("canines/beagle", &["pets"]),
    ("canines/chihuahuas", &["pets"]),
    ("canines/chihuahuas/apple_head", &["pets"]),
    ("canines/corgy", &["pets"]),
    ("canines/hyena", &["predators"]),
    ("canines/red_fox", &[]),
    ("felines", &[]),
    ("felines/cheetah", &["predators"]),
    ("felines/persian", &["pets"]),
    ("marsupials", &[]),
    ("marsupials/kangaroo", &[]),
    ("marsupials/koala", &[]),
    ("mots.rst", &[]),
    ("mots.yml", &[]),
    ("pigs", &[]),
    ("pigs/miniature_pig", &["domesticated_animals"]),
    ("pigs/wild_boar", &["domesticated_animals"]),
];

#[test]
fn test_full_index_maps_every_path() {
    let fixture = Fixture::new();
    let directory = fixture.directory(true);
    let index = directory.index();
    let root = fixture.root();

    assert_eq!(index.len(), 24);
    for (path, expected) in EXPECTED {
        let path = root.join(path);
        assert!(index.contains(&path), "{} missing from index", path.display());
        assert_eq!(
            index.machine_names(&path),
            expected.to_vec(),
            "wrong modules for {}",
            path.display()
        );
    }
    assert!(!index.contains(&root.join(".hg")));
    assert!(!index.contains(root));
}

#[test]
fn test_sparse_index_holds_only_claimed_paths() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);
    let index = directory.index();
    let root = fixture.root();

    assert!(!index.contains(&root.join("marsupials/koala")));
    assert!(!index.contains(&root.join("birds")));
    // Contested by both top-level modules; the exclusive one yields.
    assert_eq!(index.machine_names(&root.join("canines/beagle")), vec!["pets"]);
    assert_eq!(index.machine_names(&root.join("bovines/cow")), vec!["domesticated_animals"]);
}

#[test]
fn test_calculate_paths_excludes_submodule_paths() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);
    let root = fixture.root();

    let domesticated = directory.module("domesticated_animals").unwrap();
    let predators = directory.module("predators").unwrap();

    let predator_paths = predators.calculate_paths();
    assert_eq!(predator_paths.len(), 3);
    assert!(predator_paths.contains(&root.join("canines/hyena")));
    assert!(predator_paths.contains(&root.join("felines/cheetah")));
    assert!(predator_paths.contains(&root.join("birds/eagle")));

    let domesticated_paths = domesticated.calculate_paths();
    assert_eq!(domesticated_paths.len(), 10);
    assert!(domesticated_paths.is_disjoint(&predator_paths));
    assert!(!domesticated_paths.contains(&root.join("canines/red_fox")));
}

#[test]
fn test_submodule_inherits_empty_fields() {
    let fixture = Fixture::new();
    let directory = fixture.directory(false);

    let predators = directory.module("predators").unwrap();
    assert_eq!(predators.parent.as_deref(), Some("domesticated_animals"));
    // Own owners, inherited peers.
    assert_eq!(directory.nicks(&predators.owners), vec!["jill"]);
    assert_eq!(directory.nicks(&predators.peers), vec!["jill"]);
}

#[test]
fn test_reload_picks_up_new_path() {
    let fixture = Fixture::new();
    let mut directory = fixture.directory(false);
    let new_path = fixture.root().join("canines/chihuahuas/deer_head");

    fs::write(&new_path, "").unwrap();
    assert!(!directory.index().contains(&new_path));

    directory.load(false, None).unwrap();
    assert_eq!(directory.index().machine_names(&new_path), vec!["pets"]);
}

#[test]
fn test_reload_drops_deleted_path() {
    let fixture = Fixture::new();
    let mut directory = fixture.directory(false);
    let existing = fixture.root().join("canines/chihuahuas/apple_head");
    assert_eq!(directory.index().machine_names(&existing), vec!["pets"]);

    fs::remove_file(&existing).unwrap();
    directory.load(false, None).unwrap();
    assert!(!directory.index().contains(&existing));
}
