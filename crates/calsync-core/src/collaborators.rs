//! External programs the bootstrap hands off to after validation.
//!
//! Only their exit status is consulted; neither has a stdout contract.

use calsync_fs::SetupPath;

use crate::BootstrapError;
use crate::context::BootstrapContext;
use crate::process::{CommandRunner, Invocation};
use crate::runtime::RuntimeHandle;

/// Materializes the validated `config.ini` into the engine's internal form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigInitializer;

impl ConfigInitializer {
    pub fn new() -> Self {
        Self
    }

    pub fn invocation(&self, context: &BootstrapContext, runtime: &RuntimeHandle) -> Invocation {
        Invocation::new(&runtime.path)
            .arg(SetupPath::Initializer.as_str())
            .arg(context.config_path().to_string_lossy())
            .current_dir(&context.root)
    }

    pub async fn initialize(
        &self,
        context: &BootstrapContext,
        runtime: &RuntimeHandle,
        runner: &dyn CommandRunner,
    ) -> Result<(), BootstrapError> {
        let invocation = self.invocation(context, runtime);
        let output = runner
            .run(&invocation)
            .await
            .map_err(|e| BootstrapError::ConfigLoadFailed {
                command: invocation.to_string(),
                detail: format!("could not be started: {}", e),
            })?;

        if !output.success() {
            return Err(BootstrapError::ConfigLoadFailed {
                command: invocation.to_string(),
                detail: output.describe_exit(),
            });
        }
        Ok(())
    }
}

/// Registers the launcher with the platform's periodic task scheduler.
///
/// The registrar is optional: its absence is a failure like any other, and
/// every failure here is reported as recoverable by the orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerRegistrar;

impl SchedulerRegistrar {
    pub fn new() -> Self {
        Self
    }

    pub async fn register(
        &self,
        context: &BootstrapContext,
        runner: &dyn CommandRunner,
    ) -> Result<(), BootstrapError> {
        let entry = context.path(SetupPath::Scheduler);
        if !entry.is_file() {
            return Err(BootstrapError::SchedulerRegistrationFailed {
                detail: format!("{} not found", SetupPath::Scheduler),
            });
        }

        let invocation = Invocation::new(&entry).current_dir(&context.root);
        let output = runner.run(&invocation).await.map_err(|e| {
            BootstrapError::SchedulerRegistrationFailed {
                detail: e.to_string(),
            }
        })?;

        if !output.success() {
            return Err(BootstrapError::SchedulerRegistrationFailed {
                detail: format!("{} {}", SetupPath::Scheduler, output.describe_exit()),
            });
        }
        Ok(())
    }
}

/// Runs the generated launcher once to perform the initial sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncRunner;

impl SyncRunner {
    pub fn new() -> Self {
        Self
    }

    pub async fn run_once(
        &self,
        context: &BootstrapContext,
        runner: &dyn CommandRunner,
    ) -> Result<(), BootstrapError> {
        let invocation = Invocation::new(context.launcher_path()).current_dir(&context.root);
        let output = runner.run(&invocation).await.map_err(|e| {
            BootstrapError::InitialSyncFailed {
                detail: e.to_string(),
            }
        })?;

        if !output.success() {
            return Err(BootstrapError::InitialSyncFailed {
                detail: format!("{} {}", SetupPath::Launcher, output.describe_exit()),
            });
        }
        Ok(())
    }
}
