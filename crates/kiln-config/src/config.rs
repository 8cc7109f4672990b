//! The build configuration descriptor.
//!
//! [`BuildSettings`] is the raw, serde-level input with paths relative to a
//! base directory. [`BuildSettings::resolve`] validates it and produces the
//! immutable [`BuildConfig`] handed to the bundler.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defines::GlobalDefines;
use crate::dev::DevServerOptions;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::paths::resolve_path;
use crate::plugin::Plugin;
use crate::rules::{RuleMatch, RuleSet};
use crate::template::NameTemplate;
use crate::types::{Mode, SourceMap};
use crate::validation::{ConfigValidator, SchemaValidator, check_unique_entries};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    #[serde(default)]
    pub mode: Mode,

    /// Source map style; follows `mode` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<SourceMap>,

    /// Entry points, loaded in order
    #[serde(default)]
    pub entries: Vec<PathBuf>,

    #[serde(default)]
    pub output: OutputOptions,

    /// Global constants; the mode flag is added on resolve
    #[serde(default)]
    pub defines: GlobalDefines,

    #[serde(default)]
    pub plugins: Vec<Plugin>,

    #[serde(default)]
    pub rules: RuleSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerOptions>,
}

impl BuildSettings {
    /// Development build of a single-page app: a dev-only bootstrap script
    /// loaded before the app, inline source maps, hot reload and a dev server.
    pub fn development() -> Self {
        Self {
            mode: Mode::Development,
            source_map: None,
            entries: vec![
                PathBuf::from("templates/js/script.dev.js"),
                PathBuf::from("app/script.js"),
            ],
            output: OutputOptions {
                path_info: true,
                ..OutputOptions::default()
            },
            defines: GlobalDefines::new(),
            plugins: vec![
                Plugin::DefineGlobals {},
                Plugin::HotReload {},
                Plugin::GenerateHtmlShell {
                    template: PathBuf::from("templates/html/index.dev.html"),
                },
            ],
            rules: RuleSet::standard(Mode::Development),
            dev_server: Some(DevServerOptions::default()),
        }
    }

    /// Production counterpart of [`BuildSettings::development`].
    pub fn production() -> Self {
        Self {
            mode: Mode::Production,
            source_map: None,
            entries: vec![PathBuf::from("app/script.js")],
            output: OutputOptions {
                filename: NameTemplate::new("[name].[contenthash].js"),
                ..OutputOptions::default()
            },
            defines: GlobalDefines::new(),
            plugins: vec![
                Plugin::DefineGlobals {},
                Plugin::GenerateHtmlShell {
                    template: PathBuf::from("templates/html/index.html"),
                },
            ],
            rules: RuleSet::standard(Mode::Production),
            dev_server: None,
        }
    }

    /// Validate and resolve every path against `base`.
    ///
    /// Pure: no file is read and nothing is checked for existence.
    ///
    /// # Example
    ///
    /// ```
    /// use kiln_config::BuildSettings;
    /// use std::path::Path;
    ///
    /// let config = BuildSettings::development().resolve(Path::new("/repo")).unwrap();
    /// assert_eq!(config.entries()[1], Path::new("/repo/app/script.js"));
    /// ```
    pub fn resolve(&self, base: &Path) -> Result<BuildConfig> {
        SchemaValidator.validate(self)?;

        let entries = self
            .entries
            .iter()
            .map(|entry| resolve_path(base, entry, "entries"))
            .collect::<Result<Vec<_>>>()?;
        check_unique_entries(&self.entries, &entries)?;

        let mut output = self.output.clone();
        output.dir = resolve_path(base, &self.output.dir, "output.dir")?;

        let plugins = self
            .plugins
            .iter()
            .map(|plugin| match plugin {
                Plugin::GenerateHtmlShell { template } => Ok(Plugin::GenerateHtmlShell {
                    template: resolve_path(base, template, "plugins.generate-html-shell.template")?,
                }),
                other => Ok(other.clone()),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut defines = self.defines.clone();
        defines.inject_mode_flag(self.mode);

        let config = BuildConfig {
            base_dir: resolve_path(base, Path::new("."), "base")?,
            mode: self.mode,
            source_map: self.source_map.unwrap_or(self.mode.default_source_map()),
            entries,
            output,
            defines,
            plugins,
            rules: self.rules.clone(),
            dev_server: self.dev_server.clone(),
        };

        debug!(
            mode = config.mode.flag(),
            entries = config.entries.len(),
            rules = config.rules.len(),
            plugins = config.plugins.len(),
            "resolved build configuration"
        );

        Ok(config)
    }
}

/// Immutable, validated build configuration with absolute paths
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfig {
    base_dir: PathBuf,
    mode: Mode,
    source_map: SourceMap,
    entries: Vec<PathBuf>,
    output: OutputOptions,
    defines: GlobalDefines,
    plugins: Vec<Plugin>,
    rules: RuleSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    dev_server: Option<DevServerOptions>,
}

impl BuildConfig {
    /// Development descriptor for the project rooted at `base`
    pub fn development(base: impl AsRef<Path>) -> Result<Self> {
        BuildSettings::development().resolve(base.as_ref())
    }

    /// Production descriptor for the project rooted at `base`
    pub fn production(base: impl AsRef<Path>) -> Result<Self> {
        BuildSettings::production().resolve(base.as_ref())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn source_map(&self) -> SourceMap {
        self.source_map
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn output(&self) -> &OutputOptions {
        &self.output
    }

    pub fn defines(&self) -> &GlobalDefines {
        &self.defines
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn dev_server(&self) -> Option<&DevServerOptions> {
        self.dev_server.as_ref()
    }

    /// Resolved HTML shell template, if the shell generator is active
    pub fn html_template(&self) -> Option<&Path> {
        self.plugins.iter().find_map(|plugin| match plugin {
            Plugin::GenerateHtmlShell { template } => Some(template.as_path()),
            _ => None,
        })
    }

    pub fn has_plugin(&self, kind: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.kind() == kind)
    }

    /// The rule handling `resource`; relative paths are taken from the base directory.
    pub fn rule_for(&self, resource: &Path) -> Option<RuleMatch<'_>> {
        self.rules.resolve(&self.base_dir.join(resource))
    }

    /// Emitted asset name of `resource`, if its rule writes it out as a file
    pub fn asset_name(&self, resource: &Path, content: &[u8]) -> Option<Result<String>> {
        let resource = self.base_dir.join(resource);
        self.rules
            .resolve(&resource)?
            .asset_name(&resource, &self.base_dir, content)
    }
}
