//! Content hashes of the registry and its rendered export
//!
//! The config hash covers the document with its volatile fields (`updated_at` and the
//! stored hashes) removed, so rewriting an unchanged document keeps the same hash. The
//! export hash covers the rendered file's raw bytes. Both are BLAKE3, hex encoded.

use crate::error::StorageError;
use crate::registry::document::{Hashes, RegistryDocument};
use std::fmt;
use std::path::Path;
use tracing::debug;

const VOLATILE_KEYS: &[&str] = &["hashes", "updated_at"];

/// Hash of the canonical document content.
pub fn config_hash(doc: &RegistryDocument) -> Result<String, StorageError> {
    let mut value =
        serde_yaml::to_value(doc).map_err(|e| StorageError::Serialize(e.to_string()))?;
    if let serde_yaml::Value::Mapping(mapping) = &mut value {
        for key in VOLATILE_KEYS {
            mapping.remove(*key);
        }
    }
    let canonical =
        serde_yaml::to_string(&value).map_err(|e| StorageError::Serialize(e.to_string()))?;
    Ok(hex::encode(blake3::hash(canonical.as_bytes()).as_bytes()))
}

/// Hash of a rendered export.
pub fn export_hash(contents: &[u8]) -> String {
    hex::encode(blake3::hash(contents).as_bytes())
}

/// Fresh hashes for `doc`; the export hash is present only when an export was rendered.
pub fn calculate_hashes(
    doc: &RegistryDocument,
    export: Option<&[u8]>,
) -> Result<Hashes, StorageError> {
    Ok(Hashes {
        config: Some(config_hash(doc)?),
        export: export.map(export_hash),
    })
}

/// A stored hash that no longer matches the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMismatch {
    /// `"config"` or `"export"`
    pub category: &'static str,
    pub stored: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for HashMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |hash: &Option<String>| hash.clone().unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "Mismatch in {} hash detected: {} does not match {}. {} file is out of date.",
            self.category,
            show(&self.actual),
            show(&self.stored),
            self.category
        )
    }
}

/// Compare stored hashes with the current content, one entry per mismatched category.
///
/// The export is checked only when the document names an export path; a missing export
/// file counts as a mismatch.
pub fn check_hashes(
    doc: &RegistryDocument,
    repo_path: &Path,
) -> Result<Vec<HashMismatch>, StorageError> {
    let mut mismatches = Vec::new();

    let actual = config_hash(doc)?;
    if doc.hashes.config.as_deref() != Some(actual.as_str()) {
        mismatches.push(HashMismatch {
            category: "config",
            stored: doc.hashes.config.clone(),
            actual: Some(actual),
        });
    }

    if let Some(export_path) = &doc.export.path {
        let full = repo_path.join(export_path);
        let actual = match std::fs::read(&full) {
            Ok(contents) => Some(export_hash(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        if actual.is_none() || doc.hashes.export != actual {
            mismatches.push(HashMismatch {
                category: "export",
                stored: doc.hashes.export.clone(),
                actual,
            });
        }
    }

    debug!(mismatches = mismatches.len(), "Hashes checked");
    Ok(mismatches)
}
