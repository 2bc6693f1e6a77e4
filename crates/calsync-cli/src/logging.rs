use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Environment variable holding filter directives; overrides `--verbose`.
pub const LOG_ENV: &str = "CALSYNC_LOG";

/// Default filter directives when [`LOG_ENV`] is unset.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global subscriber. Events go to stderr so stdout stays free
/// for the closing summary.
pub fn init(verbose: bool) -> Result<()> {
    let filter_layer = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "info");
        assert_eq!(default_directives(true), "debug");
    }

    #[test]
    fn test_logging_init() {
        // We can only init once per process
        let _ = init(false);

        tracing::info!("This is an info message");
        tracing::warn!("This is a warning message");
    }
}
