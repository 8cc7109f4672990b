//! File-based config discovery for CLI use
//!
//! Settings are layered, later layers winning: the development preset, the
//! project manifest (`kiln.toml`, or the `kiln` field of `package.json`),
//! then `KILN_`-prefixed environment variables with `__` separating nested
//! keys (`KILN_BUILD__DEV_SERVER__PORT=3000`).

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde_json::Value;
use tracing::debug;

use crate::config::BuildConfig;
use crate::error::{ConfigError, Result};
use crate::manifest::Manifest;

pub const MANIFEST_FILE: &str = "kiln.toml";
pub const ENV_PREFIX: &str = "KILN_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use kiln_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// println!("{} entries", config.entries().len());
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    file: Option<PathBuf>,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file: None,
        }
    }

    /// Use `file` instead of searching the root directory
    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: kiln.toml
    /// 2. package.json (kiln field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(MANIFEST_FILE);
        if toml_path.is_file() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed = serde_json::from_str::<Value>(&content).ok()?;
        parsed
            .get("kiln")
            .is_some_and(|v| !v.is_null())
            .then_some(pkg_path)
    }

    /// Load the layered manifest and apply `profile`.
    ///
    /// Layers, later ones winning: the development preset, the manifest file
    /// (explicit, `kiln.toml` or the `kiln` field of `package.json`), then
    /// `KILN_*` environment variables. The manifest is returned unresolved,
    /// so callers can read `settings` before resolving `build`.
    ///
    /// # Arguments
    ///
    /// * `profile` - Profile to apply on top of the layers, if any
    ///
    /// # Errors
    ///
    /// * [`ConfigError::NotFound`] when an explicit file does not exist
    /// * [`ConfigError::SchemaViolation`] when a layer has a malformed value
    /// * [`ConfigError::ProfileNotFound`] for an undeclared profile
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kiln_config::ConfigDiscovery;
    ///
    /// let manifest = ConfigDiscovery::new(".").load_manifest(Some("production")).unwrap();
    /// println!("log level: {:?}", manifest.settings.log_level);
    /// ```
    pub fn load_manifest(&self, profile: Option<&str>) -> Result<Manifest> {
        let mut figment = Figment::from(Serialized::defaults(Manifest::default()));

        let file = match &self.file {
            Some(file) if !file.is_file() => return Err(ConfigError::NotFound),
            Some(file) => Some(file.clone()),
            None => self.find(),
        };

        match &file {
            Some(path) if is_package_json(path) => {
                figment = figment.merge(Serialized::defaults(package_json_section(path)?));
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => debug!(root = %self.root.display(), "no manifest found, using defaults"),
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let manifest: Manifest = figment.extract().map_err(from_figment)?;
        debug!(file = ?file, "loaded manifest");
        manifest.materialize_profile(profile)
    }

    /// Load and resolve the descriptor for the root directory
    pub fn load(&self) -> Result<BuildConfig> {
        self.load_profile(None)
    }

    /// Load with profile merging
    pub fn load_with_profile(&self, profile: &str) -> Result<BuildConfig> {
        self.load_profile(Some(profile))
    }

    fn load_profile(&self, profile: Option<&str>) -> Result<BuildConfig> {
        let manifest = self.load_manifest(profile)?;
        let root = std::path::absolute(&self.root)?;
        manifest.build.resolve(&root)
    }
}

fn is_package_json(path: &Path) -> bool {
    path.file_name() == Some(std::ffi::OsStr::new("package.json"))
}

fn package_json_section(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: Some(format!("Invalid JSON: {e}")),
    })?;

    match parsed.get("kiln") {
        Some(Value::Null) | None => Err(ConfigError::InvalidValue {
            field: "kiln".to_string(),
            hint: Some("Add a 'kiln' field to your package.json".to_string()),
        }),
        Some(section) => Ok(section.clone()),
    }
}

fn from_figment(err: figment::Error) -> ConfigError {
    let field = if err.path.is_empty() {
        "manifest".to_string()
    } else {
        err.path.join(".")
    };
    ConfigError::SchemaViolation {
        field,
        message: err.kind.to_string(),
        hint: err
            .metadata
            .as_ref()
            .map(|md| format!("Check the value set by {}", md.name)),
    }
}

/// Discover and load config from current directory (convenience function)
pub fn discover() -> Result<BuildConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

/// Discover and load config with profile (convenience function)
pub fn discover_with_profile(profile: &str) -> Result<BuildConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load_with_profile(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn find_prefers_toml_over_package_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"kiln": {}}"#).unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "").unwrap();
        let found = ConfigDiscovery::new(dir.path()).find().unwrap();
        assert_eq!(found, dir.path().join(MANIFEST_FILE));
    }

    #[test]
    fn find_ignores_package_json_without_field() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "app"}"#).unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = ConfigDiscovery::new(dir.path())
            .with_file(dir.path().join("missing.toml"))
            .load();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }
}
