//! [`TestProject`] builder for bootstrap scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// A temporary project root paired with a directory of module repositories.
///
/// # Example
///
/// ```rust,no_run
/// use boot_test_utils::project::TestProject;
///
/// let project = TestProject::new();
/// let alpha = project.module("org", "alpha", "tool", &[]);
/// project.write_seed(&[&alpha]);
/// project.assert_file_exists("init.yaml");
/// ```
pub struct TestProject {
    root: TempDir,
    remotes: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty project and an empty remotes directory.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
            remotes: TempDir::new().unwrap(),
        }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Directory holding the module repositories.
    pub fn remotes(&self) -> &Path {
        self.remotes.path()
    }

    /// Reference string for a module repository, whether or not it exists yet.
    pub fn reference(&self, owner: &str, name: &str) -> String {
        git::module_repo_path(self.remotes(), owner, name)
            .to_string_lossy()
            .into_owned()
    }

    /// Create a module repository and return its reference string.
    pub fn module(&self, owner: &str, name: &str, module_type: &str, requirements: &[&str]) -> String {
        let manifest = git::module_manifest(module_type, requirements);
        self.module_with_manifest(owner, name, &manifest)
    }

    /// Create a module repository with a hand-written `init.yaml`.
    pub fn module_with_manifest(&self, owner: &str, name: &str, manifest: &str) -> String {
        git::module_repo(self.remotes(), owner, name, manifest)
            .to_string_lossy()
            .into_owned()
    }

    /// Write the project's `init.yaml` with the given seed modules.
    pub fn write_seed(&self, modules: &[&str]) {
        let mut manifest = String::from("modules:\n");
        if modules.is_empty() {
            manifest = String::from("modules: []\n");
        }
        for module in modules {
            manifest.push_str(&format!("  - '{}'\n", module));
        }
        fs::write(self.root().join("init.yaml"), manifest).unwrap();
    }

    /// Write `.boot/config.toml`.
    pub fn write_config(&self, content: &str) {
        let dir = self.root().join(".boot");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), content).unwrap();
    }

    /// Absolute path for `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Assert that `path` (relative to the project root) exists.
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

    /// Assert that `path` (relative to the project root) does **not** exist.
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

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
