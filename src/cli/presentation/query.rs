//! Query presentation.

use crate::directory::Directory;
use crate::error::{ApiError, StorageError};
use crate::query::QueryResult;
use std::collections::BTreeSet;

/// One `path:module_names:owner_nicks` line per resolved path. Names and nicks are
/// comma separated; a path no module claims has both fields empty.
pub fn format_query_text(directory: &Directory, result: &QueryResult) -> String {
    if result.path_map.is_empty() {
        return "No paths resolved.".to_string();
    }
    result
        .path_map
        .iter()
        .map(|(path, modules)| {
            let names: Vec<&str> = modules
                .iter()
                .map(|module| module.machine_name.as_str())
                .collect();
            let owners: BTreeSet<_> = modules
                .iter()
                .flat_map(|module| module.owners.iter())
                .collect();
            format!(
                "{}:{}:{}",
                path,
                names.join(","),
                directory.nicks(owners).join(",")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_query_json(result: &QueryResult) -> Result<String, ApiError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| ApiError::StorageError(StorageError::Serialize(e.to_string())))
}
