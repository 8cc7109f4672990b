//! Command implementations. Each returns the text to print on stdout.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use kiln_config::{BuildConfig, FsValidator, Loader, Manifest};
use tracing::{debug, info};

use crate::cli::{Cli, Command, ExplainArgs, ShowArgs};
use crate::error::Result;

/// Resolve the manifest against the root and run the selected command.
pub fn run(cli: &Cli, manifest: Manifest) -> Result<String> {
    let root = std::path::absolute(&cli.root)?;
    let config = manifest.build.resolve(&root)?;
    debug!(root = %root.display(), "configuration resolved");

    match &cli.command {
        Command::Show(args) => show(&config, args),
        Command::Explain(args) => Ok(explain(&config, args)),
        Command::Check => check(&config),
    }
}

pub fn show(config: &BuildConfig, args: &ShowArgs) -> Result<String> {
    let value = config.to_webpack_value();
    let text = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    Ok(text)
}

pub fn explain(config: &BuildConfig, args: &ExplainArgs) -> String {
    let mut out = String::new();

    for file in &args.files {
        let Some(matched) = config.rule_for(file) else {
            let _ = writeln!(out, "{}: no rule (handled by the bundler itself)", file.display());
            continue;
        };

        let chain = matched
            .loaders()
            .map(Loader::bundler_name)
            .collect::<Vec<_>>()
            .join(" -> ");
        let _ = writeln!(
            out,
            "{}: rule #{} `{}`: {}",
            file.display(),
            matched.index,
            matched.rule.name,
            chain
        );

        let resource = config.base_dir().join(file);
        if matched.rule.uses.iter().any(|l| l.asset_name().is_some()) {
            let line = match fs::read(&resource) {
                Ok(content) => match matched.asset_name(&resource, config.base_dir(), &content) {
                    Some(Ok(name)) => format!("emitted as {}", config.output().public_url(&name)),
                    Some(Err(err)) => format!("cannot name asset: {err}"),
                    None => continue,
                },
                Err(_) => "emitted name depends on the file, which was not found".to_string(),
            };
            let _ = writeln!(out, "  {line}");
        }
    }

    out
}

pub fn check(config: &BuildConfig) -> Result<String> {
    FsValidator::check(config)?;
    info!(entries = config.entries().len(), "all referenced files exist");
    Ok(format!(
        "ok: {} entries{}",
        config.entries().len(),
        config
            .html_template()
            .map(|t| format!(", template {}", display_relative(t, config.base_dir())))
            .unwrap_or_default()
    ))
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
