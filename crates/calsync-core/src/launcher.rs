//! Launcher script generation

use calsync_fs::{SetupPath, io};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::BootstrapError;
use crate::context::BootstrapContext;
use crate::runtime::RuntimeHandle;

/// Writes `run_sync.sh`, the fixed entry point for manual and scheduled syncs.
///
/// The script is rendered purely from the working directory and the runtime
/// path, so identical inputs always produce identical bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LauncherScriptGenerator;

impl LauncherScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, root: &Path, runtime: &RuntimeHandle) -> String {
        format!(
            "#!/bin/sh\n\
             # Generated by calsync-setup. Rewritten on every bootstrap run; do not edit.\n\
             cd {root} || exit 1\n\
             exec {runtime} {engine} \"$@\"\n",
            root = shell_quote(&root.to_string_lossy()),
            runtime = shell_quote(&runtime.path.to_string_lossy()),
            engine = shell_quote(SetupPath::Engine.as_str()),
        )
    }

    /// Overwrite the launcher and mark it executable. Returns its path.
    pub fn generate(
        &self,
        context: &BootstrapContext,
        runtime: &RuntimeHandle,
    ) -> Result<PathBuf, BootstrapError> {
        let path = context.launcher_path();
        let script = self.render(&context.root, runtime);

        io::write_atomic(&path, script.as_bytes()).map_err(BootstrapError::LauncherWriteFailed)?;
        io::set_executable(&path).map_err(BootstrapError::LauncherWriteFailed)?;

        Ok(path)
    }
}

/// Quote for POSIX sh. Plain paths pass through unchanged.
fn shell_quote(value: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(value)).into_owned()
}
