//! Temporary library fixtures for tests.
//!
//! [`TestLibrary`] backs a [`Library`] with a tempdir that lives as long as
//! the fixture. Keep the fixture in scope for the duration of the test or
//! the files disappear under the engine.

use std::path::Path;

use grepd_core::Library;

/// A library root in a temporary directory.
pub struct TestLibrary {
    dir: tempfile::TempDir,
    default_source: String,
}

impl TestLibrary {
    /// Create an empty library with `quote_file.txt` as its default source.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
            default_source: "quote_file.txt".to_string(),
        }
    }

    /// Write a source file with the given lines (newline-terminated).
    pub fn with_source(self, name: &str, lines: &[&str]) -> Self {
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(self.dir.path().join(name), content).expect("failed to write source");
        self
    }

    /// Override the default source name.
    pub fn with_default_source(mut self, name: &str) -> Self {
        self.default_source = name.to_string();
        self
    }

    /// The on-disk library root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Build a [`Library`] over this fixture.
    pub fn library(&self) -> Library {
        Library::new(self.dir.path(), &self.default_source)
    }
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}
