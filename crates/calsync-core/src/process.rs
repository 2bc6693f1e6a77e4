//! Process seam.
//!
//! Every external program the bootstrap touches is located and executed
//! through [`CommandRunner`]. The production [`SystemRunner`] spawns real
//! processes with tokio and waits for each one before returning, so steps
//! stay strictly sequential.

use async_trait::async_trait;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::{Error, Result};

/// A single program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of inheriting the terminal
    pub capture: bool,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// File name of the program, e.g. `python3` for `/usr/bin/python3`.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short description of how the process ended, for diagnostics.
    pub fn describe_exit(&self) -> String {
        match self.code {
            Some(0) => "exited successfully".to_string(),
            Some(code) => format!("exited with status {}", code),
            None => "was terminated by a signal".to_string(),
        }
    }
}

/// Locates and runs external programs.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Resolve a program name on the executable search path.
    fn find(&self, program: &str) -> Option<PathBuf>;

    /// Run the invocation to completion.
    ///
    /// A nonzero exit is reported in [`CommandOutput::code`], not as an
    /// error; `Err` means the process could not be started at all.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Runs real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    search_path: Option<OsString>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look programs up in `search_path` instead of the process `PATH`.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn resolve_in(&self, program: &str, cwd: &Path) -> Option<PathBuf> {
        match &self.search_path {
            Some(paths) => which::which_in(program, Some(paths), cwd).ok(),
            None => which::which(program).ok(),
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    fn find(&self, program: &str) -> Option<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.resolve_in(program, &cwd)
    }

    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        tracing::debug!(command = %invocation, capture = invocation.capture, "running");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let spawn_error = |source| Error::Spawn {
            command: invocation.to_string(),
            source,
        };

        let output = if invocation.capture {
            let output = cmd
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(spawn_error)?;
            CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        } else {
            let status = cmd.status().await.map_err(spawn_error)?;
            CommandOutput {
                code: status.code(),
                ..CommandOutput::default()
            }
        };

        tracing::debug!(command = %invocation, code = ?output.code, "finished");
        Ok(output)
    }
}
