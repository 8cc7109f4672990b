//! Project manifest: build settings, named profiles and global settings.
//!
//! For file discovery, see the `discovery` module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::BuildSettings;
use crate::error::{ConfigError, Result};
use crate::plugin::Plugin;
use crate::types::Mode;

/// Profile available without being declared in the manifest
pub const PRODUCTION_PROFILE: &str = "production";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "BuildSettings::development")]
    pub build: BuildSettings,

    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,

    #[serde(default)]
    pub settings: GlobalSettings,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            build: BuildSettings::development(),
            profiles: HashMap::new(),
            settings: GlobalSettings::default(),
        }
    }
}

/// Partial overrides applied on top of the base manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub build: Value,

    #[serde(default)]
    pub settings: Value,
}

impl ProfileConfig {
    /// Overrides turning `base` into a production build.
    ///
    /// Only mode-related keys change: mode, source maps, the bundle
    /// filename, path info and the dev server. Hot reload is dropped from the
    /// plugin list. Entries, plugins and rules still equal to the development
    /// preset are swapped for their production counterparts; customized ones
    /// are kept.
    ///
    /// # Arguments
    ///
    /// * `base` - The build settings the profile is applied to
    ///
    /// # Examples
    ///
    /// ```
    /// use kiln_config::{BuildSettings, ProfileConfig};
    ///
    /// let profile = ProfileConfig::production(&BuildSettings::development());
    /// assert_eq!(profile.build["mode"], "production");
    /// assert!(profile.build["dev_server"].is_null());
    /// ```
    pub fn production(base: &BuildSettings) -> Self {
        let dev = BuildSettings::development();
        let prod = BuildSettings::production();

        let mut build = json!({
            "mode": Mode::Production,
            "source_map": Value::Null,
            "output": {
                "filename": prod.output.filename,
                "path_info": false,
            },
            "dev_server": Value::Null,
        });

        let entries = if base.entries == dev.entries {
            prod.entries
        } else {
            base.entries.clone()
        };
        let plugins = if base.plugins == dev.plugins {
            prod.plugins
        } else {
            base.plugins
                .iter()
                .filter(|plugin| **plugin != Plugin::HotReload {})
                .cloned()
                .collect()
        };
        let rules = if base.rules == dev.rules {
            prod.rules
        } else {
            base.rules.clone()
        };

        build["entries"] = json!(entries);
        build["plugins"] = json!(plugins);
        build["rules"] = json!(rules);

        Self {
            build,
            settings: Value::Null,
        }
    }
}

/// Settings shared across profiles that do not affect the build itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Log filter used when neither flags nor `RUST_LOG` set one
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Manifest {
    /// Create from a JSON value (for programmatic configuration)
    ///
    /// # Example
    ///
    /// ```
    /// use kiln_config::Manifest;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let manifest = Manifest::from_value(json!({
    ///     "build": { "entries": ["src/main.js"] }
    /// }))
    /// .unwrap();
    /// assert_eq!(manifest.build.entries, vec![PathBuf::from("src/main.js")]);
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::SchemaViolation {
            field: "manifest".to_string(),
            message: e.to_string(),
            hint: None,
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "manifest".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Apply the overrides of `profile`.
    ///
    /// Overrides are deep-merged: objects merge key by key, arrays and
    /// scalars replace. `production` is available even when the manifest does
    /// not declare it (see [`ProfileConfig::production`]).
    ///
    /// # Arguments
    ///
    /// * `profile` - Profile name, or `None` to leave the manifest unchanged
    ///
    /// # Examples
    ///
    /// ```
    /// use kiln_config::{Manifest, Mode};
    ///
    /// let manifest = Manifest::default().materialize_profile(Some("production")).unwrap();
    /// assert_eq!(manifest.build.mode, Mode::Production);
    /// assert!(Manifest::default().materialize_profile(Some("staging")).is_err());
    /// ```
    pub fn materialize_profile(mut self, profile: Option<&str>) -> Result<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };

        let profile_cfg = match self.profiles.get(name) {
            Some(cfg) => cfg.clone(),
            None if name == PRODUCTION_PROFILE => ProfileConfig::production(&self.build),
            None => return Err(ConfigError::ProfileNotFound(name.to_string())),
        };
        debug!(profile = name, "applying profile overrides");

        if !profile_cfg.build.is_null() {
            self.build = merge_into(&self.build, &profile_cfg.build, name, "build")?;
        }
        if !profile_cfg.settings.is_null() {
            self.settings = merge_into(&self.settings, &profile_cfg.settings, name, "settings")?;
        }

        Ok(self)
    }
}

fn merge_into<T>(base: &T, overrides: &Value, profile: &str, section: &str) -> Result<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let field = format!("profiles.{profile}.{section}");
    let mut merged = serde_json::to_value(base).map_err(|e| ConfigError::InvalidValue {
        field: field.clone(),
        hint: Some(e.to_string()),
    })?;
    merge_values(&mut merged, overrides);
    serde_json::from_value(merged).map_err(|e| ConfigError::SchemaViolation {
        field,
        message: e.to_string(),
        hint: None,
    })
}

/// Objects merge key by key; arrays and scalars replace.
fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
