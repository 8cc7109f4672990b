//! Ordered, pattern-matched transform rules.
//!
//! Rules are evaluated in declaration order and the first rule that accepts a
//! resource handles it. A rule accepts a resource when none of its `exclude`
//! matchers match and its `test` (if any) does. A rule without `test` is the
//! catch-all and is expected to come last.
//!
//! Handler chains are declared in the bundler's order and run right-to-left:
//! `[style, css]` loads the stylesheet first, then injects it.

mod loader;
mod matcher;

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use loader::Loader;
pub use matcher::{Matcher, Pattern};

use crate::error::{ConfigError, Result};
use crate::template::NameContext;
use crate::types::Mode;

/// A single transform rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Unique label used in diagnostics
    pub name: String,

    /// Files this rule applies to; `None` makes it the catch-all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Matcher>,

    /// Files this rule never applies to, even if `test` matches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Matcher>,

    /// Handler chain, in the bundler's declaration order
    #[serde(rename = "use")]
    pub uses: Vec<Loader>,
}

impl Rule {
    pub fn new(name: impl Into<String>, test: Option<Matcher>, uses: Vec<Loader>) -> Self {
        Self {
            name: name.into(),
            test,
            exclude: Vec::new(),
            uses,
        }
    }

    pub fn excluding(mut self, matcher: Matcher) -> Self {
        self.exclude.push(matcher);
        self
    }

    pub fn is_catch_all(&self) -> bool {
        self.test.is_none()
    }

    pub fn excludes(&self, resource: &Path) -> bool {
        self.exclude.iter().any(|m| m.matches(resource))
    }

    /// Exclusions are checked before the test; both must pass.
    pub fn accepts(&self, resource: &Path) -> bool {
        if self.excludes(resource) {
            return false;
        }
        self.test.as_ref().is_none_or(|test| test.matches(resource))
    }

    /// Loaders in the order they run over a file's contents
    pub fn execution_order(&self) -> impl Iterator<Item = &Loader> {
        self.uses.iter().rev()
    }

    fn has_path_guard(&self) -> bool {
        self.exclude.iter().any(Matcher::is_path_guard)
    }

    fn validate(&self) -> Result<()> {
        let field = format!("rules.{}", self.name);

        if self.uses.is_empty() {
            return Err(ConfigError::schema_with_hint(
                format!("{field}.use"),
                "rule has no loaders",
                "Add at least one loader to `use`",
            ));
        }

        if let Some(test) = &self.test {
            test.validate(&format!("{field}.test"))?;
        }
        for exclude in &self.exclude {
            exclude.validate(&format!("{field}.exclude"))?;
        }
        for (i, loader) in self.uses.iter().enumerate() {
            loader.validate(&format!("{field}.use.{i}"))?;
        }

        Ok(())
    }
}

/// The rule that handles a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    /// Position of the rule in declaration order
    pub index: usize,
    pub rule: &'a Rule,
}

impl<'a> RuleMatch<'a> {
    pub fn loaders(&self) -> impl Iterator<Item = &'a Loader> {
        self.rule.execution_order()
    }

    /// Emitted name for `resource` if the rule writes it out as an asset.
    pub fn asset_name(&self, resource: &Path, context: &Path, content: &[u8]) -> Option<Result<String>> {
        let template = self.rule.uses.iter().find_map(Loader::asset_name)?;
        let ctx = NameContext::resource(resource, context).with_content(content);
        Some(template.render(&ctx))
    }
}

/// Transform rules in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self(rules)
    }

    /// Rules for a typical single-page app: scripts, stylesheets, Elm
    /// modules, images, and a catch-all for other static files.
    pub fn standard(mode: Mode) -> Self {
        let debug = mode == Mode::Development;
        Self(vec![
            Rule::new(
                "js",
                Some(Matcher::extension("js")),
                vec![Loader::Babel { compact: true }],
            )
            .excluding(static_guard("node_modules")),
            Rule::new(
                "css",
                Some(Matcher::extension("css")),
                vec![Loader::Style {}, Loader::Css { source_map: debug }],
            ),
            Rule::new(
                "elm",
                Some(Matcher::extension("elm")),
                vec![Loader::Elm { verbose: debug }],
            )
            .excluding(static_guard("elm-stuff"))
            .excluding(static_guard("node_modules")),
            Rule::new(
                "images",
                Some(Matcher::extensions(["jpg", "jpeg", "png", "gif"])),
                vec![Loader::File {
                    name: Some("[path][name].[ext]".into()),
                }],
            ),
            Rule::new("assets", None, vec![Loader::File { name: None }])
                .excluding(Matcher::extension("css"))
                .excluding(Matcher::extension("js"))
                .excluding(Matcher::extension("html"))
                .excluding(Matcher::extension("json")),
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.0.iter().find(|rule| rule.name == name)
    }

    /// The first rule accepting `resource`, if any.
    pub fn resolve(&self, resource: &Path) -> Option<RuleMatch<'_>> {
        let found = self
            .0
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.accepts(resource))
            .map(|(index, rule)| RuleMatch { index, rule });

        trace!(
            resource = %resource.display(),
            rule = found.map(|m| m.rule.name.as_str()),
            "resolved transform rule"
        );
        found
    }

    /// Every rule whose conditions accept `resource`, ignoring precedence.
    pub fn candidates(&self, resource: &Path) -> Vec<&Rule> {
        self.0.iter().filter(|rule| rule.accepts(resource)).collect()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.0 {
            if rule.name.trim().is_empty() {
                return Err(ConfigError::schema("rules", "rule name cannot be empty"));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(ConfigError::schema(
                    format!("rules.{}", rule.name),
                    "rule name is used more than once",
                ));
            }
            rule.validate()?;
        }

        self.check_conflicts()
    }

    /// Reject rules that can never win for files an earlier rule also takes.
    ///
    /// A later rule whose test repeats an unguarded earlier test is shadowed
    /// outright. Otherwise every extension the rules mention is probed, and
    /// two rules accepting a probe conflict when nothing lets files fall
    /// through the earlier one. The catch-all, as the later rule, is the
    /// intended fallback.
    fn check_conflicts(&self) -> Result<()> {
        for (i, later) in self.0.iter().enumerate() {
            let Some(test) = &later.test else {
                continue;
            };
            let source = test.to_regex_source();
            let shadowing = self.0[..i].iter().find(|earlier| {
                !earlier.has_path_guard()
                    && earlier
                        .test
                        .as_ref()
                        .is_some_and(|t| t.to_regex_source() == source)
            });
            if let Some(earlier) = shadowing {
                return Err(ConfigError::RuleConflict {
                    first: earlier.name.clone(),
                    second: later.name.clone(),
                    resource: test.to_string(),
                });
            }
        }

        let probes: BTreeSet<String> = self
            .0
            .iter()
            .flat_map(|rule| rule.test.iter().chain(rule.exclude.iter()))
            .flat_map(Matcher::named_extensions)
            .collect();

        for ext in probes {
            let probe = PathBuf::from(format!("module.{ext}"));
            let accepting = self.candidates(&probe);

            for (i, later) in accepting.iter().enumerate().skip(1) {
                if later.is_catch_all() {
                    continue;
                }
                if let Some(earlier) = accepting[..i].iter().find(|r| !r.has_path_guard()) {
                    return Err(ConfigError::RuleConflict {
                        first: earlier.name.clone(),
                        second: later.name.clone(),
                        resource: probe.display().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn static_guard(pattern: &str) -> Matcher {
    Matcher::regex(pattern).expect("static guard pattern is a valid regex")
}
