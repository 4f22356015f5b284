//! [`TestProject`] builder for resolution test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;
use wb_fs::{ConfigFile, NormalizedPath};

/// A temporary project directory with helpers for writing config files.
///
/// # Example
///
/// ```rust,no_run
/// use wb_test_utils::TestProject;
/// use serde_json::json;
///
/// let project = TestProject::new()
///     .manifest(json!({ "schemaVersion": "1.0.0", "entries": [{ "entry": "src/a.ts" }] }))
///     .package_json(json!({ "name": "demo", "version": "1.0.0" }));
/// project.assert_file_exists("project-manifest.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root path of the project.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root path as a [`NormalizedPath`].
    pub fn normalized_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestProject::file: failed to write {}: {e}", path.display()));
        self
    }

    /// Write `project-manifest.json`.
    pub fn manifest(self, manifest: Value) -> Self {
        self.json_file(ConfigFile::Manifest.as_str(), &manifest)
    }

    /// Write `web-builder.config.json`.
    pub fn user_config(self, config: Value) -> Self {
        self.json_file(ConfigFile::UserConfig.as_str(), &config)
    }

    /// Write `package.json`.
    pub fn package_json(self, package: Value) -> Self {
        self.json_file(ConfigFile::PackageJson.as_str(), &package)
    }

    /// Write the site marker file.
    pub fn site_marker(self) -> Self {
        self.file(ConfigFile::SiteMarker.as_str(), "{}")
    }

    fn json_file(self, relative: &str, value: &Value) -> Self {
        let content = serde_json::to_string_pretty(value).unwrap();
        self.file(relative, &content)
    }

    /// Assert that `relative` exists in the project.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}\nFull path: {}",
            relative,
            full_path.display()
        );
    }
}
