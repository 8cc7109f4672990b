//! kiln CLI entry point: parse arguments, load the manifest, set up logging,
//! dispatch the command.

use clap::Parser;
use kiln_cli::{cli, commands, error, logger};
use kiln_config::ConfigDiscovery;
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let mut discovery = ConfigDiscovery::new(&args.root);
    if let Some(file) = &args.config {
        discovery = discovery.with_file(file);
    }
    let manifest = discovery.load_manifest(args.profile.as_deref());

    // The manifest may pick the log level, so load it before logging starts
    let log_level = manifest
        .as_ref()
        .ok()
        .and_then(|m| m.settings.log_level.clone());
    let no_color = args.no_color || !logger::should_use_colors();
    logger::init_logger(args.verbose, args.quiet, no_color, log_level.as_deref());

    let output = manifest
        .map_err(error::CliError::from)
        .and_then(|manifest| commands::run(&args, manifest))
        .map_err(error::to_report)?;

    println!("{output}");
    Ok(())
}
