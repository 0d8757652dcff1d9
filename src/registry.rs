//! Registry document
//!
//! The YAML file that declares modules and people for a repository, how it is read and
//! written, and the checks and maintenance operations that run over it.

pub mod document;
pub mod hashes;
pub mod ops;
pub mod store;
pub mod validate;

pub use document::{ExportConfig, Hashes, RegistryDocument};
pub use hashes::{calculate_hashes, check_hashes, HashMismatch};
pub use ops::{add, clean, refresh_people, CleanReport};
pub use store::FileRegistry;
pub use validate::{validate, ValidationError};
