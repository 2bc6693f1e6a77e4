//! Structural and semantic checks on a parsed configuration

use ini::Properties;
use std::fmt;

use super::store::{ConfigStore, Configuration, ParseError};
use super::{CALENDAR_FIELD, DATABASES_SECTION, GLOBAL_SECTION, TOKEN_FIELD};

/// Why a configuration was not accepted.
///
/// Variants are listed in check order; only the first failing check is reported.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("Configuration is unreadable: {0}")]
    Unreadable(#[from] ParseError),

    #[error("Configuration is missing the [{section}] section")]
    SectionMissing { section: &'static str },

    #[error("Configuration field `{field}` in [global] is empty")]
    FieldEmpty { field: &'static str },

    #[error(
        "Configuration has no real database id in [databases]; \
         replace the placeholder with at least one Notion database id"
    )]
    NoRealDatabases,
}

/// One usable `[databases]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub key: String,
    pub id: String,
}

/// A configuration that passed every check.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidConfig {
    pub token: String,
    pub calendar_name: String,
    /// Real entries, in document order
    pub databases: Vec<DatabaseEntry>,
}

impl ValidConfig {
    /// Global fields that still carry their scaffolded placeholder.
    pub fn placeholder_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if is_placeholder(&self.token) {
            fields.push(TOKEN_FIELD);
        }
        if is_placeholder(&self.calendar_name) {
            fields.push(CALENDAR_FIELD);
        }
        fields
    }
}

// Token stays out of logs and panic messages
impl fmt::Debug for ValidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidConfig")
            .field("token", &"<redacted>")
            .field("calendar_name", &self.calendar_name)
            .field("databases", &self.databases)
            .finish()
    }
}

/// Scaffolded stand-in values follow the `your_<x>_here` convention.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("your_") && value.ends_with("_here")
}

/// Keys starting with `#` or `;` are commented-out entries.
pub fn is_comment_key(key: &str) -> bool {
    key.starts_with('#') || key.starts_with(';')
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    /// Load the document from `store` and validate it.
    pub fn check(&self, store: &ConfigStore) -> Result<ValidConfig, Rejection> {
        let config = store.load()?;
        self.validate(&config)
    }

    pub fn validate(&self, config: &Configuration) -> Result<ValidConfig, Rejection> {
        let global = config.global().ok_or(Rejection::SectionMissing {
            section: GLOBAL_SECTION,
        })?;
        let databases = config.databases().ok_or(Rejection::SectionMissing {
            section: DATABASES_SECTION,
        })?;

        let token = required_field(global, TOKEN_FIELD)?;
        let calendar_name = required_field(global, CALENDAR_FIELD)?;

        let entries: Vec<DatabaseEntry> = databases
            .iter()
            .filter(|(key, _)| !is_comment_key(key))
            .filter_map(|(key, value)| {
                let id = value.trim();
                if id.is_empty() || is_placeholder(id) {
                    return None;
                }
                Some(DatabaseEntry {
                    key: key.to_string(),
                    id: id.to_string(),
                })
            })
            .collect();

        if entries.is_empty() {
            return Err(Rejection::NoRealDatabases);
        }

        Ok(ValidConfig {
            token,
            calendar_name,
            databases: entries,
        })
    }
}

/// Absent and whitespace-only values both count as empty.
fn required_field(section: &Properties, field: &'static str) -> Result<String, Rejection> {
    section
        .get(field)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(Rejection::FieldEmpty { field })
}
