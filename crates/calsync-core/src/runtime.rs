//! Python runtime discovery and version gating

use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::BootstrapError;
use crate::process::{CommandRunner, Invocation};

/// Interpreter names searched on PATH, in order of preference.
pub const RUNTIME_CANDIDATES: &[&str] = &["python3", "python"];

/// Oldest interpreter the sync engine supports.
pub const MINIMUM_VERSION: RuntimeVersion = RuntimeVersion::new(3, 7);

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)").expect("version pattern is valid"));

/// `major.minor` of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
}

impl RuntimeVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Extract the first `major.minor` pair from `--version` output,
    /// e.g. `Python 3.11.4` or `Python 3.13.0rc1`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = VERSION_PATTERN.captures(text)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        Some(Self { major, minor })
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The interpreter selected for this run. Read-only once probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeHandle {
    /// Candidate name that matched, e.g. `python3`
    pub program: String,
    /// Resolved absolute path
    pub path: PathBuf,
    pub version: RuntimeVersion,
    /// Raw `--version` line, for logs
    pub version_line: String,
}

/// Finds a usable Python on PATH.
#[derive(Debug, Clone)]
pub struct EnvironmentProbe {
    candidates: Vec<String>,
    minimum: RuntimeVersion,
}

impl Default for EnvironmentProbe {
    fn default() -> Self {
        Self {
            candidates: RUNTIME_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            minimum: MINIMUM_VERSION,
        }
    }
}

impl EnvironmentProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(&self) -> RuntimeVersion {
        self.minimum
    }

    /// Take the first candidate found on PATH and check its version.
    ///
    /// Later candidates are not consulted once one is found, even if the
    /// found one turns out to be too old.
    pub async fn probe(&self, runner: &dyn CommandRunner) -> Result<RuntimeHandle, BootstrapError> {
        let (program, path) = self
            .candidates
            .iter()
            .find_map(|name| runner.find(name).map(|path| (name.clone(), path)))
            .ok_or_else(|| BootstrapError::RuntimeNotFound {
                candidates: self.candidates.join(", "),
            })?;

        tracing::debug!(program = %program, path = %path.display(), "found runtime candidate");

        let query = Invocation::new(&path).arg("--version").captured();
        let output = runner.run(&query).await.map_err(|e| {
            BootstrapError::RuntimeVersionUnreadable {
                program: program.clone(),
                detail: e.to_string(),
            }
        })?;

        if !output.success() {
            return Err(BootstrapError::RuntimeVersionUnreadable {
                program,
                detail: format!("`{}` {}", query, output.describe_exit()),
            });
        }

        // Interpreters before 3.4 print the version on stderr
        let version_line = if output.stdout.trim().is_empty() {
            output.stderr.trim().to_string()
        } else {
            output.stdout.trim().to_string()
        };

        let version = RuntimeVersion::parse(&version_line).ok_or_else(|| {
            BootstrapError::RuntimeVersionUnreadable {
                program: program.clone(),
                detail: format!("unrecognised version output {:?}", version_line),
            }
        })?;

        if version < self.minimum {
            return Err(BootstrapError::RuntimeTooOld {
                program,
                found: version,
                required: self.minimum,
            });
        }

        Ok(RuntimeHandle {
            program,
            path,
            version,
            version_line,
        })
    }
}
