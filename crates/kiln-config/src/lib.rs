//! Typed build configuration for a JavaScript bundler's development mode.
//!
//! A [`BuildConfig`] declares everything the bundler needs for one
//! build-and-serve cycle: entry points, output naming, source maps, global
//! defines, plugin activations, ordered transform rules and dev server flags.
//! It is built once from [`BuildSettings`] (paths relative to a base
//! directory), validated eagerly, and never mutated afterwards.

pub mod config;
pub mod defines;
pub mod dev;
pub mod discovery;
pub mod error;
mod export;
pub mod manifest;
pub mod output;
pub mod paths;
pub mod plugin;
pub mod rules;
pub mod template;
pub mod types;
pub mod validation;

// Re-export main types
pub use config::*;
pub use defines::GlobalDefines;
pub use dev::*;
pub use error::*;
pub use manifest::*;
pub use output::OutputOptions;
pub use paths::resolve_path;
pub use plugin::Plugin;
pub use rules::{Loader, Matcher, Pattern, Rule, RuleMatch, RuleSet};
pub use template::{NameContext, NameTemplate, Placeholder};
pub use types::*;

// Re-export discovery and validation
pub use discovery::{ConfigDiscovery, discover, discover_with_profile};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
