//! Merge rules: built-in defaults applied before any file or environment source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("registry_file", "mots.yml")?
        .set_default("directory.base_url", "https://bugzilla.mozilla.org/rest")?
        .set_default("export.default_format", "rst")?
        .set_default("logging.level", "info")?
        .set_default("logging.output", "stderr")
}
