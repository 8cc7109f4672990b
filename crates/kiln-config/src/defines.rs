//! Build-time global constant injections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::types::Mode;

/// Identifier → constant value, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalDefines(IndexMap<String, Value>);

impl GlobalDefines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a define, rejecting a key that is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if self.0.contains_key(&key) {
            return Err(ConfigError::schema(
                format!("defines.{key}"),
                "identifier is defined more than once",
            ));
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check keys are identifiers and agree with `mode`.
    pub(crate) fn validate(&self, mode: Mode) -> Result<()> {
        for key in self.0.keys() {
            validate_identifier_path(key)?;
        }

        if self.0.contains_key(mode.opposite_flag()) {
            return Err(ConfigError::schema_with_hint(
                format!("defines.{}", mode.opposite_flag()),
                format!("`{}` cannot be defined in a {} build", mode.opposite_flag(), mode.flag()),
                format!("Remove it or switch `mode` to \"{}\"", mode.opposite_flag()),
            ));
        }

        if let Some(value) = self.0.get(mode.flag()).filter(|v| **v != Value::Bool(true)) {
            return Err(ConfigError::schema(
                format!("defines.{}", mode.flag()),
                format!("must be `true` in a {} build (got {value})", mode.flag()),
            ));
        }

        Ok(())
    }

    /// Add the mode flag (`development = true`) unless it is already present.
    pub(crate) fn inject_mode_flag(&mut self, mode: Mode) {
        if !self.0.contains_key(mode.flag()) {
            self.0.shift_insert(0, mode.flag().to_string(), Value::Bool(true));
        }
    }
}

impl FromIterator<(String, Value)> for GlobalDefines {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Accepts `NAME` and dotted paths such as `process.env.NODE_ENV`.
fn validate_identifier_path(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ConfigError::schema("defines", "define name cannot be empty"));
    }

    for part in key.split('.') {
        let mut chars = part.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');
        let valid_rest = chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');

        if !valid_start || !valid_rest {
            return Err(ConfigError::schema_with_hint(
                format!("defines.{key}"),
                format!("`{key}` is not a valid identifier"),
                "Use a JavaScript identifier or a dotted path like process.env.NODE_ENV",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicates() {
        let mut defines = GlobalDefines::new();
        defines.insert("API_URL", "\"/api\"").unwrap();
        assert!(defines.insert("API_URL", "\"/v2\"").is_err());
        assert_eq!(defines.len(), 1);
    }

    #[test]
    fn dotted_paths_are_identifiers() {
        assert!(validate_identifier_path("process.env.NODE_ENV").is_ok());
        assert!(validate_identifier_path("$debug").is_ok());
        assert!(validate_identifier_path("1up").is_err());
        assert!(validate_identifier_path("a..b").is_err());
        assert!(validate_identifier_path("with-dash").is_err());
    }

    #[test]
    fn mode_flag_is_injected_first() {
        let mut defines = GlobalDefines::new();
        defines.insert("VERSION", "\"1.0\"").unwrap();
        defines.inject_mode_flag(Mode::Development);
        let keys: Vec<_> = defines.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["development", "VERSION"]);
        assert_eq!(defines.get("development"), Some(&Value::Bool(true)));
    }

    #[test]
    fn opposite_mode_flag_is_rejected() {
        let mut defines = GlobalDefines::new();
        defines.insert("production", true).unwrap();
        assert!(defines.validate(Mode::Development).is_err());
        assert!(defines.validate(Mode::Production).is_ok());
    }

    #[test]
    fn false_mode_flag_is_rejected() {
        let mut defines = GlobalDefines::new();
        defines.insert("development", false).unwrap();
        assert!(defines.validate(Mode::Development).is_err());
    }
}
