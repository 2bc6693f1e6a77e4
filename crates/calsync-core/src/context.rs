//! Immutable run context shared by every bootstrap step

use calsync_fs::SetupPath;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable naming the operator's preferred editor
pub const EDITOR_VAR: &str = "EDITOR";

/// Everything a step needs to know about where and how the run happens.
///
/// Captured once at startup so no step re-derives paths or reads the
/// process environment on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapContext {
    /// Absolute working directory holding the engine sources
    pub root: PathBuf,
    /// Value of `EDITOR`, if set and non-empty
    pub editor: Option<String>,
    /// Whether an interactive editor may be opened
    pub interactive: bool,
}

impl BootstrapContext {
    /// Create a non-interactive context rooted at `root`, taken as-is.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            editor: None,
            interactive: false,
        }
    }

    /// Build the context from the process environment.
    ///
    /// The directory is canonicalized so the generated launcher binds an
    /// absolute path.
    pub fn from_env(dir: &Path) -> Result<Self> {
        let root = dunce::canonicalize(dir).map_err(|source| Error::WorkingDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let editor = std::env::var(EDITOR_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            root,
            editor,
            interactive: std::io::stdin().is_terminal(),
        })
    }

    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Resolve a fixed layout entry against the working directory.
    pub fn path(&self, entry: SetupPath) -> PathBuf {
        entry.under(&self.root)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path(SetupPath::Config)
    }

    pub fn launcher_path(&self) -> PathBuf {
        self.path(SetupPath::Launcher)
    }
}
