//! kiln CLI - inspect and check a project's bundler configuration.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
