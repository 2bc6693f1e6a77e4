//! The bootstrap state machine.
//!
//! ```text
//! Start -> ProbeRuntime -> InstallDeps -> GenerateLauncher -> CheckConfig
//! CheckConfig --absent--> ScaffoldAndHalt -> Halted
//! CheckConfig --present--> ValidateConfig --reject--> FatalExit
//! ValidateConfig --accept--> InitConfig -> RegisterScheduler -> RunInitialSync -> End
//! ```
//!
//! Each state has exactly one dispatch function. Any `Fatal` outcome moves
//! the run to `FatalExit`; `RegisterScheduler` and `RunInitialSync` only ever
//! produce `Recoverable` failures.

mod report;
mod state;

pub use report::{BootstrapReport, StepRecord, Termination};
pub use state::{OutcomeKind, Phase, State, Step, StepOutcome};

use std::sync::Arc;

use crate::BootstrapError;
use crate::collaborators::{ConfigInitializer, SchedulerRegistrar, SyncRunner};
use crate::config::{ConfigStore, ConfigValidator};
use crate::context::BootstrapContext;
use crate::deps::DependencyInstaller;
use crate::editor::EditorLauncher;
use crate::launcher::LauncherScriptGenerator;
use crate::process::CommandRunner;
use crate::runtime::{EnvironmentProbe, RuntimeHandle};

/// Drives one bootstrap run from [`State::Start`] to a terminal state.
pub struct Orchestrator {
    context: BootstrapContext,
    runner: Arc<dyn CommandRunner>,
    probe: EnvironmentProbe,
    installer: DependencyInstaller,
    launcher: LauncherScriptGenerator,
    store: ConfigStore,
    validator: ConfigValidator,
    editor: EditorLauncher,
    initializer: ConfigInitializer,
    scheduler: SchedulerRegistrar,
    sync: SyncRunner,
}

impl Orchestrator {
    pub fn new(context: BootstrapContext, runner: Arc<dyn CommandRunner>) -> Self {
        let store = ConfigStore::for_context(&context);
        Self {
            context,
            runner,
            probe: EnvironmentProbe::new(),
            installer: DependencyInstaller::new(),
            launcher: LauncherScriptGenerator::new(),
            store,
            validator: ConfigValidator::new(),
            editor: EditorLauncher::new(),
            initializer: ConfigInitializer::new(),
            scheduler: SchedulerRegistrar::new(),
            sync: SyncRunner::new(),
        }
    }

    pub fn context(&self) -> &BootstrapContext {
        &self.context
    }

    pub async fn run(&self) -> BootstrapReport {
        let mut report = BootstrapReport::new();
        let mut state = State::Start;

        while !state.is_terminal() {
            let phase = state.phase();
            tracing::debug!(phase = %phase, "dispatching");

            let step = self.dispatch(state).await;
            match &step.outcome {
                StepOutcome::Success => {}
                StepOutcome::Recoverable(error) => tracing::warn!("{}", error),
                StepOutcome::Fatal(error) => {
                    tracing::debug!(phase = %phase, kind = ?error.kind(), "fatal step failure")
                }
            }

            state = step.next;
            report.record(phase, step.outcome);
        }

        report.finish(state.phase());
        tracing::debug!(final_phase = %report.final_phase, "run finished");
        report
    }

    /// Run the work of a single state.
    pub async fn dispatch(&self, state: State) -> Step {
        match state {
            State::Start => Step::success(State::ProbeRuntime),
            State::ProbeRuntime => self.probe_runtime().await,
            State::InstallDeps(runtime) => self.install_deps(runtime).await,
            State::GenerateLauncher(runtime) => self.generate_launcher(runtime),
            State::CheckConfig(runtime) => self.check_config(runtime),
            State::ScaffoldAndHalt => self.scaffold_and_halt().await,
            State::ValidateConfig(runtime) => self.validate_config(runtime),
            State::InitConfig(runtime) => self.init_config(runtime).await,
            State::RegisterScheduler => self.register_scheduler().await,
            State::RunInitialSync => self.run_initial_sync().await,
            terminal @ (State::Halted | State::FatalExit | State::End) => Step::success(terminal),
        }
    }

    async fn probe_runtime(&self) -> Step {
        match self.probe.probe(self.runner.as_ref()).await {
            Ok(runtime) => {
                tracing::info!(
                    "Using {} ({}) at {}",
                    runtime.program,
                    runtime.version_line,
                    runtime.path.display()
                );
                Step::success(State::InstallDeps(runtime))
            }
            Err(e) => Step::fatal(e),
        }
    }

    async fn install_deps(&self, runtime: RuntimeHandle) -> Step {
        tracing::info!("Installing sync engine dependencies");
        match self
            .installer
            .install(&self.context, &runtime, self.runner.as_ref())
            .await
        {
            Ok(()) => Step::success(State::GenerateLauncher(runtime)),
            Err(e) => Step::fatal(e),
        }
    }

    fn generate_launcher(&self, runtime: RuntimeHandle) -> Step {
        match self.launcher.generate(&self.context, &runtime) {
            Ok(path) => {
                tracing::info!("Wrote launcher {}", path.display());
                Step::success(State::CheckConfig(runtime))
            }
            Err(e) => Step::fatal(e),
        }
    }

    fn check_config(&self, runtime: RuntimeHandle) -> Step {
        if self.store.exists() {
            Step::success(State::ValidateConfig(runtime))
        } else {
            Step::success(State::ScaffoldAndHalt)
        }
    }

    async fn scaffold_and_halt(&self) -> Step {
        if let Err(e) = self.store.scaffold() {
            return Step::fatal(BootstrapError::ConfigScaffoldFailed(e));
        }
        tracing::info!("Created {}", self.store.path().display());

        self.editor
            .open(&self.context, self.store.path(), self.runner.as_ref())
            .await;

        tracing::info!(
            "Fill in {} with your Notion token, calendar name and database ids",
            self.store.path().display()
        );
        tracing::info!("Then run calsync-setup again");
        Step::success(State::Halted)
    }

    fn validate_config(&self, runtime: RuntimeHandle) -> Step {
        match self.validator.check(&self.store) {
            Ok(config) => {
                for field in config.placeholder_fields() {
                    tracing::warn!("[global] {} still holds its placeholder value", field);
                }
                tracing::info!(
                    "Configuration valid: calendar \"{}\", {} database(s)",
                    config.calendar_name,
                    config.databases.len()
                );
                Step::success(State::InitConfig(runtime))
            }
            Err(rejection) => Step::fatal(rejection.into()),
        }
    }

    async fn init_config(&self, runtime: RuntimeHandle) -> Step {
        match self
            .initializer
            .initialize(&self.context, &runtime, self.runner.as_ref())
            .await
        {
            Ok(()) => Step::success(State::RegisterScheduler),
            Err(e) => Step::fatal(e),
        }
    }

    async fn register_scheduler(&self) -> Step {
        match self
            .scheduler
            .register(&self.context, self.runner.as_ref())
            .await
        {
            Ok(()) => {
                tracing::info!("Registered periodic sync");
                Step::success(State::RunInitialSync)
            }
            Err(e) => Step::recoverable(e, State::RunInitialSync),
        }
    }

    async fn run_initial_sync(&self) -> Step {
        tracing::info!("Running initial sync");
        match self.sync.run_once(&self.context, self.runner.as_ref()).await {
            Ok(()) => Step::success(State::End),
            Err(e) => Step::recoverable(e, State::End),
        }
    }
}
