//! Trace of a bootstrap run and the exit contract derived from it

use super::state::{OutcomeKind, Phase, StepOutcome};
use crate::{BootstrapError, ErrorKind};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every step succeeded, apart from an optional scheduler warning
    Completed,
    /// Setup is persisted but the initial sync failed
    SyncFailed,
    /// Config was scaffolded; the operator must edit it and re-run
    AwaitingEdit,
    /// A fatal step failure stopped the run
    Aborted,
}

impl Termination {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed | Self::AwaitingEdit => 0,
            Self::SyncFailed | Self::Aborted => 1,
        }
    }
}

/// One dispatched step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    pub phase: Phase,
    pub outcome: OutcomeKind,
}

#[derive(Debug)]
pub struct BootstrapReport {
    pub steps: Vec<StepRecord>,
    /// Recoverable failures, in the order they happened
    pub warnings: Vec<BootstrapError>,
    pub fatal: Option<BootstrapError>,
    /// Terminal phase the run stopped in
    pub final_phase: Phase,
}

impl Default for BootstrapReport {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapReport {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            warnings: Vec::new(),
            fatal: None,
            final_phase: Phase::Start,
        }
    }

    pub fn record(&mut self, phase: Phase, outcome: StepOutcome) {
        self.steps.push(StepRecord {
            phase,
            outcome: outcome.kind(),
        });
        match outcome {
            StepOutcome::Success => {}
            StepOutcome::Recoverable(error) => self.warnings.push(error),
            StepOutcome::Fatal(error) => self.fatal = Some(error),
        }
    }

    pub fn finish(&mut self, phase: Phase) {
        self.final_phase = phase;
    }

    /// Phases in dispatch order.
    pub fn phases(&self) -> Vec<Phase> {
        self.steps.iter().map(|s| s.phase).collect()
    }

    pub fn visited(&self, phase: Phase) -> bool {
        self.steps.iter().any(|s| s.phase == phase)
    }

    pub fn outcome_of(&self, phase: Phase) -> Option<OutcomeKind> {
        self.steps
            .iter()
            .find(|s| s.phase == phase)
            .map(|s| s.outcome)
    }

    pub fn has_warning(&self, kind: ErrorKind) -> bool {
        self.warnings.iter().any(|w| w.kind() == kind)
    }

    pub fn termination(&self) -> Termination {
        if self.fatal.is_some() {
            Termination::Aborted
        } else if self.final_phase == Phase::Halted {
            Termination::AwaitingEdit
        } else if self.has_warning(ErrorKind::InitialSyncFailed) {
            Termination::SyncFailed
        } else {
            Termination::Completed
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.termination().exit_code()
    }
}
