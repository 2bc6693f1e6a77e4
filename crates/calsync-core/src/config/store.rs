//! On-disk configuration document

use calsync_fs::io;
use ini::{Ini, ParseOption, Properties};
use std::path::{Path, PathBuf};

use crate::context::BootstrapContext;

use super::{DATABASES_SECTION, GLOBAL_SECTION};

/// Document written on first run. Every value is a placeholder sentinel.
pub const DEFAULT_DOCUMENT: &str = "\
; calsync configuration
;
; Fill in the values below, then run calsync-setup again.

[global]
; Notion integration token (https://www.notion.so/my-integrations)
token = your_notion_token_here
; Name of the Calendar app calendar that receives the events
calendar-name = your_calendar_name_here

[databases]
; One entry per Notion database to mirror; add db_2, db_3, ... as needed
db_1 = your_database_id_here
";

/// The document could not be read or is not valid INI.
#[derive(Debug, thiserror::Error)]
#[error("cannot read {path}: {message}")]
pub struct ParseError {
    pub path: PathBuf,
    pub message: String,
}

/// Parsed configuration document.
///
/// Values are kept verbatim apart from surrounding whitespace: quotes and
/// backslashes are not interpreted, matching what the engine's own
/// configparser reader sees.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    document: Ini,
}

impl Configuration {
    pub fn from_ini_str(content: &str) -> Result<Self, ini::ParseError> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let document = Ini::load_from_str_opt(content, options)?;
        Ok(Self { document })
    }

    pub fn global(&self) -> Option<&Properties> {
        self.document.section(Some(GLOBAL_SECTION))
    }

    pub fn databases(&self) -> Option<&Properties> {
        self.document.section(Some(DATABASES_SECTION))
    }
}

/// Owns the location of `config.ini` and its lifecycle on disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_context(context: &BootstrapContext) -> Self {
        Self::new(context.config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write [`DEFAULT_DOCUMENT`]. Never overwrites an existing file.
    pub fn scaffold(&self) -> calsync_fs::Result<()> {
        io::write_new(&self.path, DEFAULT_DOCUMENT.as_bytes())
    }

    pub fn load(&self) -> Result<Configuration, ParseError> {
        let content = io::read_text(&self.path).map_err(|e| ParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        Configuration::from_ini_str(&content).map_err(|e| ParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}
