//! pip-based dependency installation for the sync engine

use calsync_fs::SetupPath;

use crate::BootstrapError;
use crate::context::BootstrapContext;
use crate::process::{CommandRunner, Invocation};
use crate::runtime::RuntimeHandle;

/// Installs the engine's declared dependencies into the probed runtime.
///
/// Runs `pip install --upgrade pip` followed by `pip install -r requirements.txt`.
/// Any failure aborts the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyInstaller;

impl DependencyInstaller {
    pub fn new() -> Self {
        Self
    }

    /// The two pip invocations, in execution order.
    pub fn plan(&self, context: &BootstrapContext, runtime: &RuntimeHandle) -> [Invocation; 2] {
        let pip = Invocation::new(&runtime.path)
            .args(["-m", "pip"])
            .current_dir(&context.root);
        [
            pip.clone().args(["install", "--upgrade", "pip"]),
            pip.args(["install", "-r", SetupPath::Manifest.as_str()]),
        ]
    }

    pub async fn install(
        &self,
        context: &BootstrapContext,
        runtime: &RuntimeHandle,
        runner: &dyn CommandRunner,
    ) -> Result<(), BootstrapError> {
        let manifest = context.path(SetupPath::Manifest);
        if !manifest.is_file() {
            return Err(BootstrapError::DependencyInstallFailed {
                command: format!("pip install -r {}", SetupPath::Manifest),
                detail: format!("cannot run: manifest {} not found", manifest.display()),
            });
        }

        for invocation in self.plan(context, runtime) {
            tracing::info!("Running {}", invocation);
            let output = runner.run(&invocation).await.map_err(|e| {
                BootstrapError::DependencyInstallFailed {
                    command: invocation.to_string(),
                    detail: format!("could not be started: {}", e),
                }
            })?;

            if !output.success() {
                return Err(BootstrapError::DependencyInstallFailed {
                    command: invocation.to_string(),
                    detail: output.describe_exit(),
                });
            }
        }

        Ok(())
    }
}
