//! Shared test utilities for the calsync workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`workspace`]: [`TestWorkspace`] builder for an engine working directory
//! - [`runner`]: [`FakeRunner`], a scripted [`calsync_core::CommandRunner`]

pub mod runner;
pub mod workspace;

pub use runner::{FakeRunner, matchers};
pub use workspace::TestWorkspace;
