//! Filesystem primitives for the calsync bootstrap
//!
//! Provides the fixed working-directory layout and the write operations
//! the bootstrap relies on: atomic replace, create-new, executable marking.

pub mod constants;
pub mod error;
pub mod io;

pub use constants::SetupPath;
pub use error::{Error, Result};
