use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::Result;
use crate::template::{NameTemplate, Placeholder};

/// A named transformation step with its own options, tagged by `loader`
///
/// ```toml
/// use = [{ loader = "style" }, { loader = "css", source_map = true }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "loader", rename_all = "snake_case", deny_unknown_fields)]
pub enum Loader {
    /// Transpile JavaScript
    Babel {
        /// Omit superfluous whitespace in the generated code
        #[serde(default)]
        compact: bool,
    },
    /// Resolve `@import`/`url()` and turn a stylesheet into a module
    Css {
        #[serde(default)]
        source_map: bool,
    },
    /// Inject a stylesheet module into the document at runtime
    Style {},
    /// Compile Elm modules to JavaScript
    Elm {
        #[serde(default)]
        verbose: bool,
    },
    /// Emit the file as-is and export its public URL
    File {
        /// Emitted asset name (defaults to `[contenthash].[ext]`)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<NameTemplate>,
    },
}

impl Loader {
    /// Short name as written in configuration
    pub fn label(&self) -> &'static str {
        match self {
            Self::Babel { .. } => "babel",
            Self::Css { .. } => "css",
            Self::Style {} => "style",
            Self::Elm { .. } => "elm",
            Self::File { .. } => "file",
        }
    }

    /// Loader package name in the bundler's schema
    pub fn bundler_name(&self) -> &'static str {
        match self {
            Self::Babel { .. } => "babel-loader",
            Self::Css { .. } => "css-loader",
            Self::Style {} => "style-loader",
            Self::Elm { .. } => "elm-webpack-loader",
            Self::File { .. } => "file-loader",
        }
    }

    /// Loader options in the bundler's schema (`None` when the loader takes none)
    pub fn bundler_options(&self) -> Option<Value> {
        match self {
            Self::Babel { compact } => Some(json!({ "compact": compact })),
            Self::Css { source_map } => Some(json!({ "sourceMap": source_map })),
            Self::Style {} => None,
            Self::Elm { verbose } => Some(json!({ "verbose": verbose })),
            Self::File { name } => {
                let mut options = Map::new();
                if let Some(name) = name {
                    options.insert("name".into(), Value::String(name.to_string()));
                }
                (!options.is_empty()).then_some(Value::Object(options))
            }
        }
    }

    /// Asset name template, for loaders that emit files
    pub fn asset_name(&self) -> Option<NameTemplate> {
        match self {
            Self::File { name } => Some(name.clone().unwrap_or_else(NameTemplate::default_asset)),
            _ => None,
        }
    }

    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        if let Self::File { name: Some(name) } = self {
            name.validate(&format!("{field}.name"), Placeholder::ASSET)?;
        }
        Ok(())
    }
}
