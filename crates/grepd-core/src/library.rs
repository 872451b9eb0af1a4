//! Library root and source-name resolution.
//!
//! A library is a flat directory of plain-text source files. Requests name
//! sources by bare filename only; anything that looks like a path is
//! rejected before the filesystem is touched.

use std::path::{Path, PathBuf};

/// Errors from source-name resolution.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("invalid source name '{0}'")]
    InvalidName(String),

    #[error("source '{0}' not found in library")]
    NotFound(String),
}

/// A fixed directory of searchable text sources.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
    default_source: String,
}

impl Library {
    /// Create a library rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>, default_source: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_source: default_source.into(),
        }
    }

    /// Build a library from the application configuration.
    pub fn from_config(config: &grepd_config::LibraryConfig) -> Self {
        Self::new(&config.root, &config.default_source)
    }

    /// The library root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The source used when a request names none.
    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    /// Resolve a source name to an on-disk path.
    ///
    /// The name must be a bare filename: empty names and names containing
    /// `..` or a path separator are rejected without touching the
    /// filesystem, so a request can never escape the library root. The
    /// resolved path must exist and be a regular file.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, LibraryError> {
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(LibraryError::InvalidName(name.to_string()));
        }

        let path = self.root.join(name);
        if !path.is_file() {
            return Err(LibraryError::NotFound(name.to_string()));
        }
        Ok(path)
    }
}
