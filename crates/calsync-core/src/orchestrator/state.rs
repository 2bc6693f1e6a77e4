//! States, step outcomes and transitions of the bootstrap state machine

use std::fmt;

use crate::BootstrapError;
use crate::runtime::RuntimeHandle;

/// A state of the bootstrap run.
///
/// States reached after probing carry the [`RuntimeHandle`], so the handle is
/// created exactly once and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Start,
    ProbeRuntime,
    InstallDeps(RuntimeHandle),
    GenerateLauncher(RuntimeHandle),
    CheckConfig(RuntimeHandle),
    ScaffoldAndHalt,
    ValidateConfig(RuntimeHandle),
    InitConfig(RuntimeHandle),
    RegisterScheduler,
    RunInitialSync,
    /// Terminal: config scaffolded, waiting for the operator to edit it
    Halted,
    /// Terminal: a fatal step failure
    FatalExit,
    /// Terminal: every step ran
    End,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Halted | Self::FatalExit | Self::End)
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Start => Phase::Start,
            Self::ProbeRuntime => Phase::ProbeRuntime,
            Self::InstallDeps(_) => Phase::InstallDeps,
            Self::GenerateLauncher(_) => Phase::GenerateLauncher,
            Self::CheckConfig(_) => Phase::CheckConfig,
            Self::ScaffoldAndHalt => Phase::ScaffoldAndHalt,
            Self::ValidateConfig(_) => Phase::ValidateConfig,
            Self::InitConfig(_) => Phase::InitConfig,
            Self::RegisterScheduler => Phase::RegisterScheduler,
            Self::RunInitialSync => Phase::RunInitialSync,
            Self::Halted => Phase::Halted,
            Self::FatalExit => Phase::FatalExit,
            Self::End => Phase::End,
        }
    }
}

/// Data-free name of a [`State`], used in run traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    ProbeRuntime,
    InstallDeps,
    GenerateLauncher,
    CheckConfig,
    ScaffoldAndHalt,
    ValidateConfig,
    InitConfig,
    RegisterScheduler,
    RunInitialSync,
    Halted,
    FatalExit,
    End,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ProbeRuntime => "probe-runtime",
            Self::InstallDeps => "install-deps",
            Self::GenerateLauncher => "generate-launcher",
            Self::CheckConfig => "check-config",
            Self::ScaffoldAndHalt => "scaffold-and-halt",
            Self::ValidateConfig => "validate-config",
            Self::InitConfig => "init-config",
            Self::RegisterScheduler => "register-scheduler",
            Self::RunInitialSync => "run-initial-sync",
            Self::Halted => "halted",
            Self::FatalExit => "fatal-exit",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one dispatched step.
#[derive(Debug)]
pub enum StepOutcome {
    Success,
    /// Reported as a warning; the run continues
    Recoverable(BootstrapError),
    /// Aborts the run
    Fatal(BootstrapError),
}

impl StepOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success => OutcomeKind::Success,
            Self::Recoverable(_) => OutcomeKind::Recoverable,
            Self::Fatal(_) => OutcomeKind::Fatal,
        }
    }
}

/// Error-free form of [`StepOutcome`] kept in the run trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Recoverable,
    Fatal,
}

/// What a state's dispatch function returns: its outcome and where to go next.
#[derive(Debug)]
pub struct Step {
    pub outcome: StepOutcome,
    pub next: State,
}

impl Step {
    pub fn success(next: State) -> Self {
        Self {
            outcome: StepOutcome::Success,
            next,
        }
    }

    pub fn recoverable(error: BootstrapError, next: State) -> Self {
        Self {
            outcome: StepOutcome::Recoverable(error),
            next,
        }
    }

    /// A fatal step always leads to [`State::FatalExit`].
    pub fn fatal(error: BootstrapError) -> Self {
        Self {
            outcome: StepOutcome::Fatal(error),
            next: State::FatalExit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_halted_fatal_and_end_are_terminal() {
        assert!(State::Halted.is_terminal());
        assert!(State::FatalExit.is_terminal());
        assert!(State::End.is_terminal());
        assert!(!State::Start.is_terminal());
        assert!(!State::ScaffoldAndHalt.is_terminal());
        assert!(!State::RunInitialSync.is_terminal());
    }

    #[test]
    fn test_fatal_step_targets_fatal_exit() {
        let step = Step::fatal(BootstrapError::InitialSyncFailed {
            detail: "boom".into(),
        });
        assert_eq!(step.next, State::FatalExit);
        assert_eq!(step.outcome.kind(), OutcomeKind::Fatal);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::RegisterScheduler.to_string(), "register-scheduler");
    }
}
