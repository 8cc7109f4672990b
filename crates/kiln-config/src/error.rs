//! Error types for configuration construction, validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Construction errors (fatal, detected before any build work)
    #[error("cannot resolve {field} path `{}`: {reason}", path.display())]
    PathResolution {
        field: String,
        path: PathBuf,
        reason: String,
    },

    #[error("invalid {field}: {message}")]
    SchemaViolation {
        field: String,
        message: String,
        hint: Option<String>,
    },

    #[error("rules `{first}` and `{second}` both claim `{resource}` without an exclusion guard")]
    RuleConflict {
        first: String,
        second: String,
        resource: String,
    },

    // Filesystem validation errors (for CLI use)
    #[error("entry path not found: {}", path.display())]
    EntryNotFound { path: PathBuf },

    #[error("HTML template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    // Manifest loading errors
    #[error("config not found")]
    NotFound,

    #[error("profile `{0}` is not defined")]
    ProfileNotFound(String),

    #[error("invalid config value for {field}")]
    InvalidValue { field: String, hint: Option<String> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub(crate) fn schema_with_hint(
        field: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Actionable suggestion attached to the error, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { hint, .. } | Self::InvalidValue { hint, .. } => {
                hint.as_deref()
            }
            Self::RuleConflict { .. } => {
                Some("Add an `exclude` guard to the earlier rule or merge the two rules")
            }
            Self::NotFound => Some("Create a kiln.toml or add a `kiln` field to package.json"),
            _ => None,
        }
    }
}
