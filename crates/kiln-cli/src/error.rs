//! CLI error type and its conversion to miette reports.

use kiln_config::ConfigError;
use miette::Report;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Loading, constructing or checking the build configuration failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert a CLI error into a miette report, carrying the config hint as help.
pub fn to_report(err: CliError) -> Report {
    match err {
        CliError::Config(e) => match e.hint().map(str::to_owned) {
            Some(hint) => miette::miette!(help = hint, "{}", e),
            None => miette::miette!("{}", e),
        },
        other => miette::miette!("{}", other),
    }
}
