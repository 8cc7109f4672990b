use serde::{Deserialize, Serialize};

/// Build mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unoptimized build with debug aids (default)
    #[default]
    Development,
    /// Optimized build
    Production,
}

impl Mode {
    /// Identifier injected as a global define for this mode, also the
    /// bundler's `mode` value
    pub fn flag(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Flag of the opposite mode; must never be defined alongside [`Mode::flag`]
    pub fn opposite_flag(self) -> &'static str {
        match self {
            Self::Development => Self::Production.flag(),
            Self::Production => Self::Development.flag(),
        }
    }

    pub fn default_source_map(self) -> SourceMap {
        match self {
            Self::Development => SourceMap::Inline,
            Self::Production => SourceMap::None,
        }
    }
}

/// Source map generation ("devtool")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMap {
    /// No source maps
    None,
    /// Source maps inlined into the bundle as data URLs
    #[default]
    Inline,
    /// External .map files
    External,
    /// External .map files without a reference comment in the bundle
    Hidden,
}

impl SourceMap {
    /// The bundler's `devtool` value, or `None` when source maps are disabled
    pub fn devtool(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Inline => Some("inline-source-map"),
            Self::External => Some("source-map"),
            Self::Hidden => Some("hidden-source-map"),
        }
    }
}
