//! Settings System
//!
//! Layered runtime settings: built-in defaults, the global settings file, an explicit
//! settings file and `MODOWNERS__*` environment variables, merged with the `config` crate.
//! The registry document itself is not a settings source; it lives next to the repository.

use crate::export::ExportFormat;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "BUGZILLA_API_KEY";

/// Root settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// People directory service
    #[serde(default)]
    pub directory: DirectorySettings,

    /// Export rendering
    #[serde(default)]
    pub export: ExportSettings,

    /// Registry file used when `--registry` is not given
    #[serde(default = "default_registry_file")]
    pub registry_file: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_registry_file() -> PathBuf {
    PathBuf::from("mots.yml")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory: DirectorySettings::default(),
            export: ExportSettings::default(),
            registry_file: default_registry_file(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Connection settings for the people directory (Bugzilla REST API).
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectorySettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Falls back to `BUGZILLA_API_KEY` when unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pause before each request, in milliseconds
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://bugzilla.mozilla.org/rest".to_string()
}

fn default_user_agent() -> String {
    format!("modowners/{}", env!("CARGO_PKG_VERSION"))
}

fn default_rate_limit_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            user_agent: default_user_agent(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Hand-written so the API key never reaches a log line.
impl std::fmt::Debug for DirectorySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorySettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("rate_limit_delay_ms", &self.rate_limit_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl DirectorySettings {
    /// Configured key, or the `BUGZILLA_API_KEY` environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

/// Links and defaults used when rendering documentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_people_search_url")]
    pub people_search_url: String,

    #[serde(default = "default_searchfox_base_url")]
    pub searchfox_base_url: String,

    #[serde(default = "default_review_group_base_url")]
    pub review_group_base_url: String,

    /// Format used when neither the command line nor the registry names one
    #[serde(default = "default_export_format")]
    pub default_format: String,
}

fn default_people_search_url() -> String {
    "https://people.mozilla.org/s?query=".to_string()
}

fn default_searchfox_base_url() -> String {
    "https://searchfox.org".to_string()
}

fn default_review_group_base_url() -> String {
    "https://phabricator.services.mozilla.com".to_string()
}

fn default_export_format() -> String {
    "rst".to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            people_search_url: default_people_search_url(),
            searchfox_base_url: default_searchfox_base_url(),
            review_group_base_url: default_review_group_base_url(),
            default_format: default_export_format(),
        }
    }
}

/// Settings validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    Directory(String),
    Export(String),
    Logging(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Directory(msg) => write!(f, "Directory: {}", msg),
            SettingsError::Export(msg) => write!(f, "Export: {}", msg),
            SettingsError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

fn check_url(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{} must be an http(s) URL, got '{}'", field, value));
    }
    Ok(())
}

impl Settings {
    /// Validate the merged settings, reporting every problem found.
    pub fn validate(&self) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if let Err(e) = check_url(&self.directory.base_url, "base_url") {
            errors.push(SettingsError::Directory(e));
        }
        if self.directory.timeout_secs == 0 {
            errors.push(SettingsError::Directory(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        for (value, field) in [
            (&self.export.people_search_url, "people_search_url"),
            (&self.export.searchfox_base_url, "searchfox_base_url"),
            (&self.export.review_group_base_url, "review_group_base_url"),
        ] {
            if let Err(e) = check_url(value, field) {
                errors.push(SettingsError::Export(e));
            }
        }
        if let Err(e) = self.export.default_format.parse::<ExportFormat>() {
            errors.push(SettingsError::Export(e.to_string()));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(SettingsError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
