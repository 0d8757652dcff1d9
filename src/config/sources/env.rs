//! Environment source: `MODOWNERS__DIRECTORY__API_KEY` sets `directory.api_key`.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "MODOWNERS";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
