//! Rendering the animals registry as documentation.

use super::support::Fixture;
use modowners::config::ExportSettings;
use modowners::error::ApiError;
use modowners::export::export_to_format;
use modowners::Directory;

fn render(fixture: &Fixture, format: &str, searchfox: bool) -> Result<String, ApiError> {
    let mut doc = fixture.registry.load().unwrap();
    doc.export.searchfox_enabled = searchfox;
    let directory = Directory::new(&doc, fixture.root());
    export_to_format(&directory, &doc.export, &ExportSettings::default(), format)
}

#[test]
fn test_rst_export() {
    let fixture = Fixture::new();
    let rst = render(&fixture, "rst", false).unwrap();

    assert!(rst.starts_with("================\nModule Ownership\n================\n"));
    assert!(rst.contains("domesticated_animals\n~~~~~~~~~~~~~~~~~~~~\n"));
    assert!(rst.contains("predators\n---------\n"));
    assert!(rst.contains("pets\n~~~~\n"));
    assert!(rst.contains(
        "    * - Owner(s)\n      - | `jane (jane) <https://people.mozilla.org/s?query=jane>`__\n"
    ));
    assert!(rst.contains("    * - Peer(s) Emeritus\n      - otis\n"));
    assert!(rst.contains("    * - Owner(s) Emeritus\n      - otis\n"));
    assert!(rst.contains(
        "    * - Includes\n      - | canines/\\*\\*/\\*\n        | felines/\\*\\*/\\*\n"
    ));
    assert!(rst.contains("    * - Excludes\n      - | canines/red_fox\n"));
    assert!(rst.ends_with('\n'));
    assert!(!rst.ends_with("\n\n"));
}

#[test]
fn test_rst_searchfox_links() {
    let fixture = Fixture::new();
    let rst = render(&fixture, "rst", true).unwrap();
    assert!(rst.contains(
        "| `canines/red_fox <https://searchfox.org/test_repo/search?q=&path=canines/red_fox>`__"
    ));
}

#[test]
fn test_md_export() {
    let fixture = Fixture::new();
    let md = render(&fixture, "md", false).unwrap();

    assert!(md.starts_with("# Module Ownership\n\n"));
    assert!(md.contains("## domesticated\\_animals\n\n"));
    assert!(md.contains("### predators\n\n"));
    assert!(md.contains(
        "* Owner(s):\n    * [otis \\(otis\\)](https://people.mozilla.org/s?query=otis)\n"
    ));
    assert!(md.contains("* Excludes:\n    * canines/red_fox\n    * canines/hyena\n"));
}

#[test]
fn test_unsupported_format() {
    let fixture = Fixture::new();
    let err = render(&fixture, "html", false).unwrap_err();
    assert!(matches!(err, ApiError::UnsupportedFormat(format) if format == "html"));
}
