//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// kiln - inspect the bundler configuration of a project
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Inspect and check a project's bundler configuration"
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root; relative paths in the manifest resolve from here
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Manifest file to use instead of kiln.toml / package.json
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to apply on top of the manifest (e.g. "production")
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the configuration in the bundler's schema
    Show(ShowArgs),
    /// Show which rule and loaders handle the given files
    Explain(ExplainArgs),
    /// Check that entries and the HTML template exist
    Check,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Files to explain, relative to the project root
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
