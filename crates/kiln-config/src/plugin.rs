use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A plugin activation, tagged by `kind`
///
/// ```toml
/// [[build.plugins]]
/// kind = "generate-html-shell"
/// template = "templates/html/index.dev.html"
/// ```
///
/// Kinds without options are empty struct variants, so stray keys on any
/// kind are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum Plugin {
    /// Emit hot updates so changed modules are swapped without a reload
    HotReload {},
    /// Inline the configured global defines at build time
    DefineGlobals {},
    /// Generate the HTML shell the bundles are injected into
    GenerateHtmlShell {
        /// HTML template (relative to the base directory until resolved)
        template: PathBuf,
    },
}

impl Plugin {
    /// Kind name as written in configuration
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HotReload {} => "hot-reload",
            Self::DefineGlobals {} => "define-globals",
            Self::GenerateHtmlShell { .. } => "generate-html-shell",
        }
    }

    /// Plugin identifier in the bundler's schema
    pub fn bundler_name(&self) -> &'static str {
        match self {
            Self::HotReload {} => "HotModuleReplacementPlugin",
            Self::DefineGlobals {} => "DefinePlugin",
            Self::GenerateHtmlShell { .. } => "HtmlWebpackPlugin",
        }
    }
}
