//! Naming templates for emitted bundles and assets (`[name].js`,
//! `[path][name].[ext]`).

use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Number of hex characters kept from a content digest.
const CONTENT_HASH_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    Ext,
    Path,
    Id,
    ContentHash,
}

impl Placeholder {
    pub const BUNDLE: &'static [Placeholder] = &[Self::Name, Self::Id, Self::ContentHash];
    pub const ASSET: &'static [Placeholder] = &[Self::Path, Self::Name, Self::Ext, Self::ContentHash];

    fn parse(token: &str) -> Option<Self> {
        match token {
            "name" => Some(Self::Name),
            "ext" => Some(Self::Ext),
            "path" => Some(Self::Path),
            "id" => Some(Self::Id),
            "contenthash" => Some(Self::ContentHash),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Ext => "ext",
            Self::Path => "path",
            Self::Id => "id",
            Self::ContentHash => "contenthash",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.token())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Placeholder),
}

/// A naming template such as `[path][name].[ext]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTemplate(String);

impl NameTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Default name for assets emitted by the file loader
    pub fn default_asset() -> Self {
        Self::new("[contenthash].[ext]")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> std::result::Result<Vec<Segment<'_>>, String> {
        let mut segments = Vec::new();
        let mut rest = self.0.as_str();

        while let Some(open) = rest.find('[') {
            if open > 0 {
                segments.push(Segment::Literal(&rest[..open]));
            }
            let after = &rest[open + 1..];
            let close = after
                .find(']')
                .ok_or_else(|| format!("unterminated placeholder in `{}`", self.0))?;
            let token = &after[..close];
            let placeholder = Placeholder::parse(token)
                .ok_or_else(|| format!("unknown placeholder `[{token}]`"))?;
            segments.push(Segment::Placeholder(placeholder));
            rest = &after[close + 1..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest));
        }
        Ok(segments)
    }

    /// Placeholders used by this template, in order of appearance
    pub fn placeholders(&self) -> Result<Vec<Placeholder>> {
        let segments = self
            .segments()
            .map_err(|message| ConfigError::schema("template", message))?;
        Ok(segments
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(p) => Some(p),
                Segment::Literal(_) => None,
            })
            .collect())
    }

    /// Check the template parses and only uses `allowed` placeholders.
    pub fn validate(&self, field: &str, allowed: &[Placeholder]) -> Result<()> {
        if self.0.trim().is_empty() {
            return Err(ConfigError::schema(field, "naming template cannot be empty"));
        }

        let segments = self
            .segments()
            .map_err(|message| ConfigError::schema(field, message))?;

        for segment in segments {
            let Segment::Placeholder(p) = segment else {
                continue;
            };
            if !allowed.contains(&p) {
                let supported = allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ConfigError::schema_with_hint(
                    field,
                    format!("placeholder {p} is not supported here"),
                    format!("Use one of: {supported}"),
                ));
            }
        }
        Ok(())
    }

    pub fn render(&self, ctx: &NameContext<'_>) -> Result<String> {
        let segments = self
            .segments()
            .map_err(|message| ConfigError::schema("template", message))?;

        let mut out = String::with_capacity(self.0.len() + 16);
        for segment in segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => out.push_str(&ctx.value(p)?),
            }
        }
        Ok(out)
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self::new("[name].js")
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NameTemplate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Values available to a template while rendering
#[derive(Debug, Clone, Default)]
pub struct NameContext<'a> {
    name: Option<String>,
    ext: Option<String>,
    path: Option<String>,
    id: Option<String>,
    content: Option<&'a [u8]>,
}

impl<'a> NameContext<'a> {
    /// Context for an emitted bundle chunk
    pub fn chunk(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Context for an asset file, with `[path]` relative to `context`
    pub fn resource(resource: &Path, context: &Path) -> Self {
        let name = resource
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        let ext = Some(
            resource
                .extension()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let dir = resource.parent().unwrap_or_else(|| Path::new(""));
        let path = match dir.strip_prefix(context) {
            Ok(relative) => join_dir(relative),
            Err(_) => join_dir(dir),
        };

        Self {
            name,
            ext,
            path: Some(path),
            id: None,
            content: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_content(mut self, content: &'a [u8]) -> Self {
        self.content = Some(content);
        self
    }

    fn value(&self, placeholder: Placeholder) -> Result<String> {
        let value = match placeholder {
            Placeholder::Name => self.name.clone(),
            Placeholder::Ext => self.ext.clone(),
            Placeholder::Path => self.path.clone(),
            Placeholder::Id => self.id.clone(),
            Placeholder::ContentHash => self.content.map(content_hash),
        };

        value.ok_or_else(|| ConfigError::InvalidValue {
            field: placeholder.to_string(),
            hint: Some(format!("no value available for {placeholder} while rendering")),
        })
    }
}

/// Truncated BLAKE3 digest used for `[contenthash]`
pub fn content_hash(content: &[u8]) -> String {
    let hex = blake3::hash(content).to_hex();
    hex.as_str()[..CONTENT_HASH_LEN].to_string()
}

fn join_dir(dir: &Path) -> String {
    let parts: Vec<String> = dir
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("_".to_string()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}/", parts.join("/"))
    }
}
