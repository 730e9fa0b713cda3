use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

use crate::utils::config::PackagePaths;

/// Colors for CLI summaries.
pub struct Colors;

impl Colors {
    pub const TEXT: &'static str = "green";
    pub const IMAGE: &'static str = "magenta";
    pub const IGNORED: &'static str = "bright black";

    pub fn colorize(color: &str, s: &str) -> String {
        s.color(color).to_string()
    }
}

/// Install the CLI logger. `DROPWALK_LOG` overrides the filter; tests may have installed one already.
///
/// Lines are tagged by stage: `drop` for progress, `walk` for per-entry detail, `warn`/`error` with
/// the emitting module so skipped subtrees can be traced back to a walker.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .parse_env(PackagePaths::get().env_log())
        .format(|buf, record| {
            let module = record.target().rsplit("::").next().unwrap_or_default();
            match record.level() {
                Level::Error => writeln!(buf, "{} {}: {}", "error".red().bold(), module, record.args()),
                Level::Warn => writeln!(buf, "{} {}: {}", "warn".yellow(), module, record.args()),
                Level::Info => writeln!(buf, "{} {}", "drop".cyan(), record.args()),
                Level::Debug | Level::Trace => writeln!(
                    buf,
                    "{} {}",
                    "walk".bright_black(),
                    format!("{module}: {}", record.args()).dimmed()
                ),
            }
        })
        .try_init();
}
