//! Global settings source: $XDG_CONFIG_HOME/modowners/settings.toml or
//! ~/.config/modowners/settings.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::PathBuf;
use tracing::debug;

/// Path to the global settings file.
pub fn global_settings_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => directories::BaseDirs::new()?.home_dir().join(".config"),
    };
    Some(base.join("modowners").join("settings.toml"))
}

/// Add the global settings file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Some(path) = global_settings_path() else {
        return Ok(builder);
    };
    if !path.exists() {
        debug!(settings_path = %path.display(), "No global settings file");
        return Ok(builder);
    }
    let path = dunce::canonicalize(&path).unwrap_or(path);
    debug!(settings_path = %path.display(), "Loading global settings");
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
}
