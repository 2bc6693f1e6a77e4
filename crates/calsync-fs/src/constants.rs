//! Fixed locations inside a calsync working directory.

use std::path::{Path, PathBuf};

/// Files the bootstrap reads, writes or executes, relative to the working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupPath {
    /// Operator configuration document
    Config,
    /// Dependency manifest consumed by pip
    Manifest,
    /// Generated entry point for manual and scheduled runs
    Launcher,
    /// Sync engine entry point
    Engine,
    /// Configuration initializer entry point
    Initializer,
    /// Scheduler registration program (optional)
    Scheduler,
}

impl SetupPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config.ini",
            Self::Manifest => "requirements.txt",
            Self::Launcher => "run_sync.sh",
            Self::Engine => "main.py",
            Self::Initializer => "src/init_conf.py",
            Self::Scheduler => "scripts/schedule_sync.sh",
        }
    }

    /// Resolve this location against a working directory.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(self.as_str())
    }
}

impl AsRef<Path> for SetupPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for SetupPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
