//! Bootstrap state machine for the calsync Notion-to-Calendar sync.
//!
//! Takes a working directory from "nothing installed" to "a periodic sync is
//! scheduled and has run once". Every external program (Python, pip, the
//! config initializer, the scheduler registrar, the launcher) is reached
//! through the [`CommandRunner`] seam, so the state machine itself only
//! sees exit statuses and captured output.

pub mod collaborators;
pub mod config;
pub mod context;
pub mod deps;
pub mod editor;
pub mod error;
pub mod launcher;
pub mod orchestrator;
pub mod process;
pub mod runtime;

pub use config::{ConfigStore, ConfigValidator, Configuration, Rejection, ValidConfig};
pub use context::BootstrapContext;
pub use error::{BootstrapError, Error, ErrorKind, Result};
pub use orchestrator::{
    BootstrapReport, Orchestrator, OutcomeKind, Phase, State, StepOutcome, Termination,
};
pub use process::{CommandOutput, CommandRunner, Invocation, SystemRunner};
pub use runtime::{EnvironmentProbe, RuntimeHandle, RuntimeVersion};
