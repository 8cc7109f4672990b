//! Bundle output location and naming.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::template::{NameContext, NameTemplate, Placeholder};

/// Where and how bundles are emitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Output directory (relative to the base directory until resolved)
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Bundle filename template
    #[serde(default)]
    pub filename: NameTemplate,

    /// URL prefix the emitted assets are served from
    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// Emit comments naming the source module of every bundled module
    #[serde(default)]
    pub path_info: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            filename: NameTemplate::default(),
            public_path: default_public_path(),
            path_info: false,
        }
    }
}

impl OutputOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        self.filename
            .validate("output.filename", Placeholder::BUNDLE)?;

        if self.public_path.is_empty() {
            return Err(ConfigError::schema_with_hint(
                "output.public_path",
                "public path cannot be empty",
                "Use \"/\" to serve assets from the server root",
            ));
        }

        if !self.public_path.ends_with('/') {
            return Err(ConfigError::schema_with_hint(
                "output.public_path",
                format!("`{}` must end with `/`", self.public_path),
                format!("Use \"{}/\"", self.public_path),
            ));
        }

        Ok(())
    }

    /// Render the emitted filename of a chunk.
    ///
    /// # Example
    ///
    /// ```
    /// use kiln_config::OutputOptions;
    ///
    /// let output = OutputOptions::default();
    /// assert_eq!(output.render_filename("main", b"").unwrap(), "main.js");
    /// ```
    pub fn render_filename(&self, chunk: &str, content: &[u8]) -> Result<String> {
        let ctx = NameContext::chunk(chunk)
            .with_id(chunk)
            .with_content(content);
        self.filename.render(&ctx)
    }

    /// Public URL of an emitted file
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}{}", self.public_path, filename.trim_start_matches('/'))
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_public_path() -> String {
    "/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_path_requires_trailing_slash() {
        let output = OutputOptions {
            public_path: "/static".into(),
            ..OutputOptions::default()
        };
        let err = output.validate().unwrap_err();
        assert_eq!(err.hint(), Some("Use \"/static/\""));
    }

    #[test]
    fn content_hashed_filename() {
        let output = OutputOptions {
            filename: NameTemplate::new("[name].[contenthash].js"),
            ..OutputOptions::default()
        };
        let name = output.render_filename("main", b"console.log(1)").unwrap();
        assert!(name.starts_with("main."));
        assert!(name.ends_with(".js"));
        assert_ne!(name, output.render_filename("main", b"console.log(2)").unwrap());
    }

    #[test]
    fn public_url_joins_without_double_slash() {
        let output = OutputOptions::default();
        assert_eq!(output.public_url("/main.js"), "/main.js");
        assert_eq!(output.public_url("img/logo.png"), "/img/logo.png");
    }
}
