//! modowners: module ownership registry
//!
//! Maps paths in a source tree to the ownership modules that claim them, and each module to
//! its owners and peers. The registry is a YAML document at the repository root; this crate
//! reads, validates, queries, maintains and renders it.

pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod export;
pub mod index;
pub mod logging;
pub mod module;
pub mod people;
pub mod query;
pub mod registry;
pub mod utils;

pub use directory::Directory;
pub use error::{ApiError, StorageError};
pub use module::{Module, ModuleSpec};
pub use query::QueryResult;
pub use registry::{FileRegistry, RegistryDocument};
