//! Operator configuration: the `config.ini` document and its validation.

mod store;
mod validate;

pub use store::{ConfigStore, Configuration, DEFAULT_DOCUMENT, ParseError};
pub use validate::{
    ConfigValidator, DatabaseEntry, Rejection, ValidConfig, is_comment_key, is_placeholder,
};

/// Section holding the token and calendar name
pub const GLOBAL_SECTION: &str = "global";
/// Section mapping identifiers to database ids
pub const DATABASES_SECTION: &str = "databases";
/// Integration token passed to the sync engine
pub const TOKEN_FIELD: &str = "token";
/// Name of the local calendar events are written to
pub const CALENDAR_FIELD: &str = "calendar-name";
