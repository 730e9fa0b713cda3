use clap::Parser;
use std::path::PathBuf;

use crate::source::Protocol;

/// Simulate dropping files and folders onto a chat composer: harvest, classify and dispatch.
#[derive(Clone, Parser)]
#[command(name = "dropwalk")]
#[command(about = "Harvest dropped paths as a drop target would; print what each consumer receives.")]
pub struct Cli {
    /// Files or directories to drop, in declaration order.
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Maximum harvested files for the whole drop. Default: 2000 (or DROPWALK_MAX_FILES).
    #[arg(long, short = 'n')]
    pub max_files: Option<usize>,

    /// Capabilities each dropped item exposes. `auto` exposes all and lets the handle protocol win.
    #[arg(long, value_enum)]
    pub protocol: Option<Protocol>,

    /// Children per legacy listing page.
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links to directories inside dropped folders.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Skip OS metadata files (.DS_Store, Thumbs.db, __MACOSX, ...). On by default.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub skip_junk: Option<bool>,

    /// Strict mode: fail when a directory cannot be listed instead of skipping it.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print the decoded contents of text files.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub print: Option<bool>,

    /// Emit one JSON object per dispatched file.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "dropwalk",
            "a.txt",
            "dir",
            "--protocol",
            "legacy",
            "-n",
            "5",
            "--strict",
            "-e",
            "*.log",
            "target",
        ])
        .unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from("a.txt"), PathBuf::from("dir")]);
        assert_eq!(cli.protocol, Some(Protocol::Legacy));
        assert_eq!(cli.max_files, Some(5));
        assert_eq!(cli.strict, Some(true));
        assert_eq!(cli.exclude, vec!["*.log".to_string(), "target".to_string()]);
        assert_eq!(cli.verbose, None);
    }

    #[test]
    fn test_paths_required() {
        assert!(Cli::try_parse_from(["dropwalk"]).is_err());
    }
}
