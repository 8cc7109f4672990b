//! Logging setup for the kiln CLI.
//!
//! The filter is chosen in this order:
//! 1. `--verbose` (debug for kiln crates) or `--quiet` (errors only)
//! 2. `RUST_LOG`
//! 3. `settings.log_level` from the manifest
//! 4. info for kiln crates
//!
//! Logs go to stderr so command output can be piped.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "kiln=debug,kiln_config=debug,kiln_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "kiln=info,kiln_config=info,kiln_cli=info";

/// Pick the log filter for the given flags and manifest level.
///
/// # Arguments
///
/// * `verbose` - Debug level for the kiln crates (wins over everything else)
/// * `quiet` - Errors only
/// * `manifest_level` - Filter directive from the manifest's `settings.log_level`,
///   used when `RUST_LOG` is unset. An unparsable directive falls back to the default.
///
/// # Examples
///
/// ```
/// use kiln_cli::logger::build_filter;
/// use tracing_subscriber::filter::LevelFilter;
///
/// let filter = build_filter(false, true, None);
/// assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
/// ```
pub fn build_filter(verbose: bool, quiet: bool, manifest_level: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            manifest_level
                .and_then(|level| EnvFilter::try_new(level).ok())
                .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
        })
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at the start of the program, before any logging occurs. The
/// filter comes from [`build_filter`]; events are written compactly to stderr.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging (overrides `quiet`)
/// * `quiet` - Only show error-level logs
/// * `no_color` - Disable colored output
/// * `manifest_level` - Filter from the manifest, if it sets one
///
/// # Examples
///
/// ```rust,no_run
/// use kiln_cli::logger::init_logger;
///
/// // Default logging (INFO level)
/// init_logger(false, false, false, None);
///
/// // Level picked by the manifest
/// init_logger(false, false, false, Some("warn"));
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, manifest_level: Option<&str>) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet, manifest_level))
        .with(fmt_layer)
        .init();
}

/// Check if colored output should be enabled.
///
/// Honours `NO_COLOR` and `FORCE_COLOR`, then falls back to terminal detection.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn verbose_wins_over_manifest_level() {
        let filter = build_filter(true, false, Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn invalid_manifest_level_falls_back_to_default() {
        // SAFETY: no other test in this crate reads RUST_LOG
        unsafe { std::env::remove_var("RUST_LOG") };
        let filter = build_filter(false, false, Some("kiln=loud"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn quiet_only_shows_errors() {
        let filter = build_filter(false, true, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }
}
