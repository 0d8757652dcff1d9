//! Path index
//!
//! Expands module glob patterns against the repository and builds the global
//! path → owning modules index that queries are answered from.

pub mod builder;
pub mod path;
pub mod resolver;
pub mod walker;

pub use builder::{DirectoryIndex, IndexBuilder, ModuleRef};
