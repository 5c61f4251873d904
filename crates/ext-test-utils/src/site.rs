//! [`TestSite`] builder for installer test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::catalog::{SAMPLE_DESCRIPTORS, SAMPLE_ENABLED};

/// A temporary site directory holding an `extensions/` descriptor
/// directory and, optionally, an `extinstall.toml`.
///
/// # Example
///
/// ```rust,no_run
/// use ext_test_utils::site::TestSite;
///
/// let site = TestSite::new();
/// site.write_sample_catalog();
/// site.write_config(&["system", "user"], "");
/// site.assert_file_exists("extensions/forum.toml");
/// ```
pub struct TestSite {
    temp_dir: TempDir,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSite {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The descriptor directory, `<root>/extensions`.
    pub fn extensions_dir(&self) -> PathBuf {
        self.root().join("extensions")
    }

    /// Path of `extinstall.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.root().join("extinstall.toml")
    }

    /// Write `extensions/<stem>.toml`.
    pub fn write_descriptor(&self, stem: &str, content: &str) -> PathBuf {
        let dir = self.extensions_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{stem}.toml"));
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_descriptor: failed to write {}: {e}", path.display()));
        path
    }

    /// Write every descriptor of the sample catalog.
    pub fn write_sample_catalog(&self) {
        for (stem, content) in SAMPLE_DESCRIPTORS {
            self.write_descriptor(stem, content);
        }
    }

    /// Write `extinstall.toml` pointing at `extensions/` with a handoff
    /// directory under the site root.
    ///
    /// `extra` is appended verbatim, for `[resolver]` or `[host]` sections.
    pub fn write_config(&self, enabled: &[&str], extra: &str) -> PathBuf {
        let enabled = enabled
            .iter()
            .map(|name| format!("\"{name}\""))
            .collect::<Vec<_>>()
            .join(", ");

        let config = format!(
            "[catalog]\npath = \"extensions\"\n\n[site]\nenabled = [{enabled}]\n\n\
             [handoff]\ndir = \"handoff\"\naccount = \"tester\"\n\n{extra}"
        );

        let path = self.config_path();
        fs::write(&path, config).unwrap();
        path
    }

    /// Write the sample catalog and a config enabling the sample's enabled
    /// extensions.
    pub fn with_sample() -> Self {
        let site = Self::new();
        site.write_sample_catalog();
        site.write_config(SAMPLE_ENABLED, "");
        site
    }

    /// Assert that `path` (relative to the site root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the site root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
