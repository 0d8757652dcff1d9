//! Filesystem walker used to pre-seed the index with every repository path

use crate::error::StorageError;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    /// Directory names that are skipped together with everything below them
    pub ignore_dirs: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_dirs: vec![".hg".to_string(), ".git".to_string()],
            max_depth: None,
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Collect every file and directory below the root, sorted by path.
    /// The root itself is not included.
    pub fn walk(&self) -> Result<Vec<PathBuf>, StorageError> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name();

        let mut paths = Vec::new();
        for entry in walker.into_iter().filter_entry(|e| !self.should_ignore(e)) {
            let entry = entry.map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk directory: {}", e),
                ))
            })?;
            paths.push(entry.into_path());
        }

        paths.sort();
        Ok(paths)
    }

    fn should_ignore(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && self
                .config
                .ignore_dirs
                .iter()
                .any(|name| entry.file_name() == name.as_str())
    }
}
