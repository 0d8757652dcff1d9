//! File-backed registry store.
//!
//! The repository root is the directory that contains the registry file. Writes replace the
//! whole document atomically: the new content goes to a temporary file next to the target,
//! is synced, and then renamed over it.

use crate::error::{ApiError, StorageError};
use crate::index::path::canonicalize_root;
use crate::registry::document::{Hashes, RegistryDocument};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
    repo_path: PathBuf,
}

impl FileRegistry {
    /// Open a registry at `path`. The file does not need to exist yet, its directory does.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let repo_path = canonicalize_root(&parent)?;
        let path = match path.file_name() {
            Some(name) => repo_path.join(name),
            None => {
                return Err(StorageError::InvalidPath(format!(
                    "{} does not name a file",
                    path.display()
                )))
            }
        };
        Ok(Self { path, repo_path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create a new, empty registry. An existing file is never overwritten.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn init(&self) -> Result<RegistryDocument, ApiError> {
        if self.path.exists() {
            warn!("Registry file already exists, leaving it untouched");
            return Err(ApiError::RegistryExists(self.path.clone()));
        }
        let repo = self
            .repo_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let doc = RegistryDocument::new(repo);
        self.write_document(&doc)?;
        info!("Registry initialized");
        Ok(doc)
    }

    fn read_text(&self) -> Result<String, StorageError> {
        fs::read_to_string(&self.path).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read registry {:?}: {}", self.path, e),
            ))
        })
    }

    fn parse_error(&self, e: serde_yaml::Error) -> StorageError {
        StorageError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }

    /// The document as an untyped YAML value, for structural validation.
    pub fn read_value(&self) -> Result<serde_yaml::Value, StorageError> {
        let text = self.read_text()?;
        serde_yaml::from_str(&text).map_err(|e| self.parse_error(e))
    }

    /// Read and decode the document.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<RegistryDocument, StorageError> {
        let text = self.read_text()?;
        let doc: RegistryDocument = serde_yaml::from_str(&text).map_err(|e| self.parse_error(e))?;
        debug!(
            modules = doc.modules.len(),
            people = doc.people.len(),
            "Registry loaded"
        );
        Ok(doc)
    }

    /// Stamp `updated_at`, store `hashes` and write the whole document.
    pub fn write(&self, doc: &mut RegistryDocument, hashes: Hashes) -> Result<(), StorageError> {
        doc.updated_at = Some(chrono::Utc::now().to_rfc3339());
        doc.hashes = hashes;
        self.write_document(doc)
    }

    fn write_document(&self, doc: &RegistryDocument) -> Result<(), StorageError> {
        let text = serde_yaml::to_string(doc).map_err(|e| StorageError::Serialize(e.to_string()))?;
        write_atomic(&self.path, text.as_bytes())?;
        debug!(path = %self.path.display(), bytes = text.len(), "Registry written");
        Ok(())
    }
}

/// Write `contents` to `path` through a synced temporary file and a rename.
///
/// The temporary file is removed whenever the write fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| StorageError::InvalidPath(format!("{} has no file name", path.display())))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let result = write_temp(&temp_path, contents).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to replace {:?}: {}", path, e),
            ))
        })
    });
    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary file");
        }
    }
    result
}

fn write_temp(temp_path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let mut file = fs::File::create(temp_path).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to create {:?}: {}", temp_path, e),
        ))
    })?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}
