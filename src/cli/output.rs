//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
///
/// Credential problems get a hint appended; the error text already names the setting.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::MissingCredentials(_) => {
            format!("{}\nCommands that read the registry only still work without a key.", e)
        }
        ApiError::RegistryExists(_) => format!("{}\nRemove it first or pass --registry.", e),
        _ => e.to_string(),
    }
}
