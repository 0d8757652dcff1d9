pub mod env;
pub mod global_file;
pub mod settings_file;
