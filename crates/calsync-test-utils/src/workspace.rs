//! [`TestWorkspace`] builder for bootstrap test scenarios.

use calsync_core::BootstrapContext;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary engine working directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use calsync_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new().with_manifest().with_scheduler();
/// ws.write_config("abc", "Work", &[("db_1", "realid123")]);
/// ws.assert_file_exists("config.ini");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Workspace with a dependency manifest and a scheduler registrar: the
    /// layout of a freshly cloned engine checkout.
    pub fn engine_checkout() -> Self {
        Self::new().with_manifest().with_scheduler()
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Non-interactive context rooted at this workspace.
    pub fn context(&self) -> BootstrapContext {
        BootstrapContext::new(self.root())
    }

    pub fn with_manifest(self) -> Self {
        self.write("requirements.txt", "requests\npandas\napplescript\n");
        self
    }

    pub fn with_scheduler(self) -> Self {
        self.write(
            "scripts/schedule_sync.sh",
            "#!/bin/sh\necho \"registered\"\n",
        );
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let path = self.path("scripts/schedule_sync.sh");
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        self
    }

    /// Write `config.ini` with the given global fields and database entries.
    pub fn write_config(&self, token: &str, calendar_name: &str, databases: &[(&str, &str)]) {
        let mut doc = format!(
            "[global]\ntoken = {}\ncalendar-name = {}\n\n[databases]\n",
            token, calendar_name
        );
        for (key, id) in databases {
            doc.push_str(&format!("{} = {}\n", key, id));
        }
        self.write("config.ini", &doc);
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let path = self.path(rel);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert that `rel` does **not** exist.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let path = self.path(rel);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }

    /// Assert that the file at `rel` contains `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read(rel);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            rel,
            content,
            file_content
        );
    }
}
