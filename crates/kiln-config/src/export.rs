//! Export to the bundler's configuration schema.
//!
//! Plugins cannot be instantiated from JSON, so they are exported as
//! `{ "plugin": <constructor>, "options": {...} }` descriptors for the loader
//! script to instantiate. Rules are wrapped in a single `oneOf` so the bundler
//! applies the first matching rule, as [`RuleSet::resolve`](crate::RuleSet::resolve) does.

use serde_json::{Map, Value, json};

use crate::config::BuildConfig;
use crate::plugin::Plugin;
use crate::rules::Rule;

impl BuildConfig {
    /// The configuration object in the bundler's schema.
    ///
    /// # Example
    ///
    /// ```
    /// use kiln_config::BuildConfig;
    ///
    /// let config = BuildConfig::development("/repo").unwrap();
    /// let value = config.to_webpack_value();
    /// assert_eq!(value["output"]["publicPath"], "/");
    /// assert_eq!(value["devtool"], "inline-source-map");
    /// ```
    pub fn to_webpack_value(&self) -> Value {
        let mut root = Map::new();

        root.insert("mode".into(), json!(self.mode().flag()));
        root.insert(
            "devtool".into(),
            self.source_map()
                .devtool()
                .map_or(Value::Bool(false), |d| json!(d)),
        );
        root.insert(
            "context".into(),
            json!(self.base_dir().to_string_lossy()),
        );
        root.insert(
            "entry".into(),
            Value::Array(
                self.entries()
                    .iter()
                    .map(|entry| json!(entry.to_string_lossy()))
                    .collect(),
            ),
        );

        let output = self.output();
        root.insert(
            "output".into(),
            json!({
                "path": output.dir.to_string_lossy(),
                "pathinfo": output.path_info,
                "publicPath": output.public_path,
                "filename": output.filename.as_str(),
            }),
        );

        root.insert(
            "plugins".into(),
            Value::Array(self.plugins().iter().map(|p| self.plugin_value(p)).collect()),
        );

        root.insert(
            "module".into(),
            json!({
                "rules": [{
                    "oneOf": self.rules().iter().map(rule_value).collect::<Vec<_>>(),
                }],
            }),
        );

        if let Some(dev) = self.dev_server() {
            root.insert(
                "devServer".into(),
                json!({
                    "hot": dev.hot,
                    "noInfo": !dev.verbose,
                    "open": dev.open,
                    "overlay": dev.overlay,
                    "host": dev.host,
                    "port": dev.port,
                }),
            );
        }

        Value::Object(root)
    }

    fn plugin_value(&self, plugin: &Plugin) -> Value {
        let options = match plugin {
            Plugin::HotReload {} => None,
            Plugin::DefineGlobals {} => Some(Value::Object(
                self.defines()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            )),
            Plugin::GenerateHtmlShell { template } => {
                Some(json!({ "template": template.to_string_lossy() }))
            }
        };

        let mut value = Map::new();
        value.insert("plugin".into(), json!(plugin.bundler_name()));
        if let Some(options) = options {
            value.insert("options".into(), options);
        }
        Value::Object(value)
    }
}

fn rule_value(rule: &Rule) -> Value {
    let mut value = Map::new();

    if let Some(test) = &rule.test {
        value.insert("test".into(), json!(test.to_regex_source()));
    }
    if !rule.exclude.is_empty() {
        value.insert(
            "exclude".into(),
            Value::Array(
                rule.exclude
                    .iter()
                    .map(|m| json!(m.to_regex_source()))
                    .collect(),
            ),
        );
    }

    let uses = rule
        .uses
        .iter()
        .map(|loader| {
            let mut entry = Map::new();
            entry.insert("loader".into(), json!(loader.bundler_name()));
            if let Some(options) = loader.bundler_options() {
                entry.insert("options".into(), options);
            }
            Value::Object(entry)
        })
        .collect();
    value.insert("use".into(), Value::Array(uses));

    Value::Object(value)
}
