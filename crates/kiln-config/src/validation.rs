//! Pluggable config validation strategies
//!
//! Separates pure schema validation (run on every construction) from
//! filesystem validation (for CLI use, before handing the config to the bundler).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::{BuildConfig, BuildSettings};
use crate::error::{ConfigError, Result};
use crate::plugin::Plugin;
use crate::types::Mode;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    /// Validate build settings
    fn validate(&self, settings: &BuildSettings) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use kiln_config::{BuildSettings, ConfigValidator, SchemaValidator};
///
/// SchemaValidator.validate(&BuildSettings::development()).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, settings: &BuildSettings) -> Result<()> {
        validate_entries(&settings.entries)?;
        settings.output.validate()?;
        settings.defines.validate(settings.mode)?;
        validate_plugins(settings)?;

        if let Some(dev) = &settings.dev_server {
            dev.validate()?;

            if dev.hot && !settings.plugins.contains(&Plugin::HotReload {}) {
                return Err(ConfigError::schema_with_hint(
                    "dev_server.hot",
                    "hot updates need the hot-reload plugin",
                    "Add `{ kind = \"hot-reload\" }` to `plugins` or set `hot = false`",
                ));
            }

            if settings.mode == Mode::Production {
                warn!("dev server options are set for a production build");
            }
        }

        settings.rules.validate()
    }
}

fn validate_entries(entries: &[PathBuf]) -> Result<()> {
    if entries.is_empty() {
        return Err(ConfigError::schema_with_hint(
            "entries",
            "no entries specified",
            "Add at least one entry script",
        ));
    }
    Ok(())
}

/// Entries must be distinct once resolved; `app/a.js` and `./app/a.js` are the same file.
pub(crate) fn check_unique_entries(declared: &[PathBuf], resolved: &[PathBuf]) -> Result<()> {
    let mut seen = HashSet::new();
    for (entry, path) in declared.iter().zip(resolved) {
        if !seen.insert(path) {
            return Err(ConfigError::schema(
                "entries",
                format!(
                    "`{}` is listed more than once (resolves to `{}`)",
                    entry.display(),
                    path.display()
                ),
            ));
        }
    }
    Ok(())
}

fn validate_plugins(settings: &BuildSettings) -> Result<()> {
    let mut kinds = HashSet::new();
    for plugin in &settings.plugins {
        if !kinds.insert(plugin.kind()) {
            return Err(ConfigError::schema(
                format!("plugins.{}", plugin.kind()),
                "plugin is activated more than once",
            ));
        }
    }

    // resolve() always injects the mode flag, so there is always something to define
    if !kinds.contains(Plugin::DefineGlobals {}.kind()) {
        return Err(ConfigError::schema_with_hint(
            "plugins",
            format!(
                "global defines (including `{}`) need the define-globals plugin",
                settings.mode.flag()
            ),
            "Add `{ kind = \"define-globals\" }` to `plugins`",
        ));
    }

    if settings.mode == Mode::Production && kinds.contains(Plugin::HotReload {}.kind()) {
        return Err(ConfigError::schema(
            "plugins.hot-reload",
            "hot reload is only available in development builds",
        ));
    }

    Ok(())
}

/// Filesystem validator (for CLI use)
///
/// Resolves the settings against `root`, then checks that entry points and
/// the HTML template exist on disk.
///
/// # Example
///
/// ```no_run
/// use kiln_config::{BuildSettings, ConfigValidator, FsValidator};
///
/// FsValidator::new(".").validate(&BuildSettings::development()).unwrap();
/// ```
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Check the files an already resolved config refers to.
    pub fn check(config: &BuildConfig) -> Result<()> {
        for entry in config.entries() {
            if !entry.is_file() {
                return Err(ConfigError::EntryNotFound {
                    path: entry.clone(),
                });
            }
        }

        if let Some(template) = config.html_template().filter(|t| !t.is_file()) {
            return Err(ConfigError::TemplateNotFound {
                path: template.to_path_buf(),
            });
        }

        Ok(())
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, settings: &BuildSettings) -> Result<()> {
        let config = settings.resolve(&self.root)?;
        Self::check(&config)
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(settings: &BuildSettings) -> Result<()> {
    SchemaValidator.validate(settings)
}

/// Convenience function for filesystem validation
pub fn validate_fs(settings: &BuildSettings, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(settings)
}
