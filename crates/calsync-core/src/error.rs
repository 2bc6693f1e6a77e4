//! Error types for calsync-core

use crate::config::Rejection;
use crate::runtime::RuntimeVersion;

/// Result type for low-level calsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised below the step level: filesystem access and process spawning.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] calsync_fs::Error),

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not resolve working directory {path}: {source}")]
    WorkingDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single bootstrap step.
///
/// Whether a failure aborts the run is decided by the orchestrator, not
/// by the error itself; see [`ErrorKind::is_recoverable`].
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("No Python runtime found on PATH (looked for: {candidates})")]
    RuntimeNotFound { candidates: String },

    #[error("Could not determine the version of {program}: {detail}")]
    RuntimeVersionUnreadable { program: String, detail: String },

    #[error("{program} reports Python {found}, but Python {required} or newer is required")]
    RuntimeTooOld {
        program: String,
        found: RuntimeVersion,
        required: RuntimeVersion,
    },

    #[error("Dependency installation failed: `{command}` {detail}")]
    DependencyInstallFailed { command: String, detail: String },

    #[error("Could not write the launcher script: {0}")]
    LauncherWriteFailed(#[source] calsync_fs::Error),

    #[error("Could not create the default configuration: {0}")]
    ConfigScaffoldFailed(#[source] calsync_fs::Error),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Configuration initializer failed: `{command}` {detail}")]
    ConfigLoadFailed { command: String, detail: String },

    #[error("Scheduler registration failed: {detail}")]
    SchedulerRegistrationFailed { detail: String },

    #[error("Initial sync failed: {detail}")]
    InitialSyncFailed { detail: String },
}

/// Flat taxonomy of step failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RuntimeNotFound,
    RuntimeVersionUnreadable,
    RuntimeTooOld,
    DependencyInstallFailed,
    LauncherWriteFailed,
    ConfigScaffoldFailed,
    ConfigUnreadable,
    ConfigSectionMissing,
    ConfigFieldEmpty,
    ConfigNoRealDatabases,
    ConfigLoadFailed,
    SchedulerRegistrationFailed,
    InitialSyncFailed,
}

impl ErrorKind {
    /// Kinds that are reported as warnings and never abort a run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SchedulerRegistrationFailed | Self::InitialSyncFailed
        )
    }
}

impl BootstrapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RuntimeNotFound { .. } => ErrorKind::RuntimeNotFound,
            Self::RuntimeVersionUnreadable { .. } => ErrorKind::RuntimeVersionUnreadable,
            Self::RuntimeTooOld { .. } => ErrorKind::RuntimeTooOld,
            Self::DependencyInstallFailed { .. } => ErrorKind::DependencyInstallFailed,
            Self::LauncherWriteFailed(_) => ErrorKind::LauncherWriteFailed,
            Self::ConfigScaffoldFailed(_) => ErrorKind::ConfigScaffoldFailed,
            Self::Rejected(rejection) => match rejection {
                Rejection::Unreadable(_) => ErrorKind::ConfigUnreadable,
                Rejection::SectionMissing { .. } => ErrorKind::ConfigSectionMissing,
                Rejection::FieldEmpty { .. } => ErrorKind::ConfigFieldEmpty,
                Rejection::NoRealDatabases => ErrorKind::ConfigNoRealDatabases,
            },
            Self::ConfigLoadFailed { .. } => ErrorKind::ConfigLoadFailed,
            Self::SchedulerRegistrationFailed { .. } => ErrorKind::SchedulerRegistrationFailed,
            Self::InitialSyncFailed { .. } => ErrorKind::InitialSyncFailed,
        }
    }
}
