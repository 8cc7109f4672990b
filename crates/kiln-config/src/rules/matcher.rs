use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, Result};

/// File matcher used by a rule's `test` and `exclude` conditions
///
/// ```toml
/// test = { extension = ["jpg", "jpeg", "png", "gif"] }
/// exclude = [{ regex = "node_modules" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Exact (case-sensitive) file extension, without the leading dot
    Extension(Vec<String>),
    /// Regular expression tested against the full resource path
    Regex(Pattern),
}

impl Matcher {
    pub fn extension(ext: impl Into<String>) -> Self {
        Self::Extension(vec![ext.into()])
    }

    pub fn extensions<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Extension(exts.into_iter().map(Into::into).collect())
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        Pattern::new(pattern).map(Self::Regex)
    }

    pub fn matches(&self, resource: &Path) -> bool {
        match self {
            Self::Extension(exts) => resource
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| exts.iter().any(|candidate| candidate == ext)),
            Self::Regex(pattern) => pattern.0.is_match(&resource.to_string_lossy()),
        }
    }

    /// Extensions named by this matcher.
    ///
    /// Regex matchers name extensions only in the shapes extension lists are
    /// exported as: `\.ext$` and `\.(a|b)$`. Alternatives that are not plain
    /// extensions (`jpe?g`) are skipped.
    pub fn named_extensions(&self) -> Vec<String> {
        match self {
            Self::Extension(exts) => exts.clone(),
            Self::Regex(pattern) => regex_extensions(pattern.as_str()),
        }
    }

    /// Whether this matcher can tell apart files sharing an extension
    pub fn is_path_guard(&self) -> bool {
        matches!(self, Self::Regex(_))
    }

    /// Regex source equivalent to this matcher, as the bundler expects it
    pub fn to_regex_source(&self) -> String {
        match self {
            Self::Extension(exts) if exts.len() == 1 => format!(r"\.{}$", regex::escape(&exts[0])),
            Self::Extension(exts) => {
                let alternatives = exts
                    .iter()
                    .map(|ext| regex::escape(ext))
                    .collect::<Vec<_>>()
                    .join("|");
                format!(r"\.({alternatives})$")
            }
            Self::Regex(pattern) => pattern.as_str().to_string(),
        }
    }

    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        let Self::Extension(exts) = self else {
            return Ok(());
        };

        if exts.is_empty() {
            return Err(ConfigError::schema(field, "extension list cannot be empty"));
        }
        for ext in exts {
            if ext.is_empty() || ext.starts_with('.') || ext.contains('/') {
                return Err(ConfigError::schema_with_hint(
                    field,
                    format!("`{ext}` is not a bare file extension"),
                    "Write extensions without the leading dot, e.g. \"css\"",
                ));
            }
        }
        Ok(())
    }
}

fn regex_extensions(source: &str) -> Vec<String> {
    let Some(body) = source
        .strip_prefix(r"\.")
        .and_then(|rest| rest.strip_suffix('$'))
    else {
        return Vec::new();
    };

    let alternatives = match body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(group) => group.strip_prefix("?:").unwrap_or(group),
        None => body,
    };

    alternatives
        .split('|')
        .filter(|ext| is_plain_extension(ext))
        .map(str::to_string)
        .collect()
}

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty()
        && ext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.to_regex_source())
    }
}

/// A compiled regular expression that round-trips through serde as its source
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        Regex::new(source).map(Self).map_err(|err| {
            ConfigError::schema_with_hint(
                "rules",
                format!("invalid regex `{source}`"),
                err.to_string(),
            )
        })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Regex::new(&source).map(Self).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_is_exact() {
        let css = Matcher::extension("css");
        assert!(css.matches(Path::new("/repo/app/style.css")));
        assert!(!css.matches(Path::new("/repo/app/style.scss")));
        assert!(!css.matches(Path::new("/repo/app/style.CSS")));
        assert!(!css.matches(Path::new("/repo/app/css")));
    }

    #[test]
    fn regex_matches_anywhere_in_path() {
        let guard = Matcher::regex("node_modules").unwrap();
        assert!(guard.matches(Path::new("/repo/node_modules/lib/index.js")));
        assert!(!guard.matches(Path::new("/repo/app/index.js")));
    }

    #[test]
    fn regex_source_for_extension_lists() {
        assert_eq!(Matcher::extension("css").to_regex_source(), r"\.css$");
        assert_eq!(
            Matcher::extensions(["jpg", "png"]).to_regex_source(),
            r"\.(jpg|png)$"
        );
    }

    #[test]
    fn extensions_named_by_regex_sources() {
        let single = Matcher::regex(r"\.ts$").unwrap();
        assert_eq!(single.named_extensions(), vec!["ts"]);

        let group = Matcher::regex(r"\.(jpe?g|png|gif)$").unwrap();
        assert_eq!(group.named_extensions(), vec!["png", "gif"]);

        let non_capturing = Matcher::regex(r"\.(?:js|mjs)$").unwrap();
        assert_eq!(non_capturing.named_extensions(), vec!["js", "mjs"]);

        let guard = Matcher::regex("node_modules").unwrap();
        assert!(guard.named_extensions().is_empty());
    }

    #[test]
    fn exported_extension_lists_name_the_same_extensions() {
        let images = Matcher::extensions(["jpg", "png"]);
        let exported = Matcher::regex(&images.to_regex_source()).unwrap();
        assert_eq!(exported.named_extensions(), images.named_extensions());
    }

    #[test]
    fn dotted_extension_is_rejected() {
        assert!(Matcher::extension(".css").validate("rules.css.test").is_err());
        assert!(Matcher::Extension(vec![]).validate("rules.css.test").is_err());
    }

    #[test]
    fn invalid_regex_is_a_schema_violation() {
        assert!(matches!(
            Matcher::regex("("),
            Err(ConfigError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn pattern_round_trips_through_json() {
        let matcher = Matcher::regex(r"\.js$").unwrap();
        let json = serde_json::to_value(&matcher).unwrap();
        assert_eq!(json, serde_json::json!({ "regex": r"\.js$" }));
        let back: Matcher = serde_json::from_value(json).unwrap();
        assert_eq!(back, matcher);
    }
}
