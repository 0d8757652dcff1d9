//! Registry presentation: init, validate, check-hashes, clean.

use crate::module::ValidationError;
use crate::registry::{CleanReport, HashMismatch};
use std::path::Path;

pub fn format_init_summary(path: &Path, repo: &str) -> String {
    format!("Initialized registry for {} at {}", repo, path.display())
}

pub fn format_validation_result(result: &Result<(), Vec<ValidationError>>) -> String {
    match result {
        Ok(()) => "Validation passed: all modules are valid.".to_string(),
        Err(errors) => {
            let mut s = format!("Validation failed with {} problem(s):", errors.len());
            for e in errors {
                s.push_str(&format!("\n  - {}", e));
            }
            s
        }
    }
}

pub fn format_hash_check(mismatches: &[HashMismatch]) -> String {
    if mismatches.is_empty() {
        return "Hashes match.".to_string();
    }
    let mut s = format!("Hash check failed ({}):", mismatches.len());
    for mismatch in mismatches {
        s.push_str(&format!("\n  - {}", mismatch));
    }
    s
}

pub fn format_clean_report(report: &CleanReport, dry_run: bool) -> String {
    let mut s = if dry_run {
        "Clean preview (nothing written):".to_string()
    } else {
        "Registry cleaned:".to_string()
    };
    s.push_str(&format!("\n  People: {}", report.people));
    s.push_str(&format!(
        "\n  References replaced: {}",
        report.references.replaced
    ));
    s.push_str(&format!(
        "\n  People registered: {}",
        report.references.registered
    ));
    s.push_str(&format!(
        "\n  Machine names generated: {}",
        report.machine_names_generated
    ));
    if let Some(path) = &report.export_written {
        s.push_str(&format!("\n  Export written: {}", path.display()));
    }
    if let Some(hashes) = &report.hashes {
        if let Some(config) = &hashes.config {
            s.push_str(&format!("\n  Config hash: {}", config));
        }
        if let Some(export) = &hashes.export {
            s.push_str(&format!("\n  Export hash: {}", export));
        }
    }
    s
}
