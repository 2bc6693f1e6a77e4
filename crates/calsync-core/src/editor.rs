//! Best-effort interactive editor for the freshly scaffolded config

use std::path::{Path, PathBuf};

use crate::context::BootstrapContext;
use crate::process::{CommandRunner, Invocation};

/// Editors tried after the operator's `EDITOR`, in order.
pub const FALLBACK_EDITORS: &[&str] = &["nano", "vi"];

/// Opens the configuration in an editor when a terminal is attached.
///
/// Nothing here can fail the run: every problem is logged and swallowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorLauncher;

impl EditorLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Candidate command lines: `EDITOR` split on whitespace, then the fallbacks.
    pub fn candidates(&self, context: &BootstrapContext) -> Vec<Vec<String>> {
        let mut candidates = Vec::new();
        if let Some(editor) = &context.editor {
            let words: Vec<String> = editor.split_whitespace().map(str::to_string).collect();
            if !words.is_empty() {
                candidates.push(words);
            }
        }
        candidates.extend(FALLBACK_EDITORS.iter().map(|e| vec![e.to_string()]));
        candidates
    }

    /// Open `file` in the first available editor. Returns the editor that ran.
    pub async fn open(
        &self,
        context: &BootstrapContext,
        file: &Path,
        runner: &dyn CommandRunner,
    ) -> Option<PathBuf> {
        if !context.interactive {
            tracing::debug!("stdin is not a terminal; not opening an editor");
            return None;
        }

        for words in self.candidates(context) {
            let Some((program, args)) = words.split_first() else {
                continue;
            };
            let Some(path) = runner.find(program) else {
                tracing::debug!(editor = %program, "editor not found");
                continue;
            };

            let invocation = Invocation::new(&path)
                .args(args.iter().cloned())
                .arg(file.to_string_lossy());
            match runner.run(&invocation).await {
                Ok(output) => {
                    if !output.success() {
                        tracing::warn!("Editor {} {}", program, output.describe_exit());
                    }
                    return Some(path);
                }
                Err(e) => tracing::debug!(editor = %program, error = %e, "editor failed to start"),
            }
        }

        tracing::debug!("no editor available");
        None
    }
}
