//! Settings loading facade: one entry point that applies every source in order.

use super::merge::merge_policy;
use super::sources::{env, global_file, settings_file};
use super::Settings;
use config::ConfigError;
use std::path::Path;
use tracing::debug;

/// Loads [`Settings`] from defaults, the global file, an optional explicit file and the
/// environment, in increasing precedence.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings. An explicit `settings_path` is layered over the global file.
    pub fn load(settings_path: Option<&Path>) -> Result<Settings, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = settings_path {
            debug!(settings_path = %path.display(), "Loading explicit settings file");
            builder = settings_file::add_to_builder(builder, path)?;
        }
        builder = env::add_to_builder(builder);

        builder.build()?.try_deserialize()
    }

    /// Load from a single file plus defaults, skipping the global file and the environment.
    pub fn load_from_file(path: &Path) -> Result<Settings, ConfigError> {
        let builder = settings_file::add_to_builder(merge_policy::builder_with_defaults()?, path)?;
        builder.build()?.try_deserialize()
    }
}
