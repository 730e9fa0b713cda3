//! Load `.dropwalk.toml` from a directory (CLI only). Lib does not use this; the consuming program injects config via DropOpts.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::source::Protocol;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub(crate) struct DropwalkToml {
    #[serde(default)]
    settings: DropSection,
}

#[derive(Debug, Default, Deserialize)]
struct DropSection {
    max_files: Option<usize>,
    exclude: Option<Vec<String>>,
    skip_os_junk: Option<bool>,
    strict: Option<bool>,
    verbose: Option<bool>,
    protocol: Option<Protocol>,
    page_size: Option<usize>,
    follow_links: Option<bool>,
    print_text: Option<bool>,
    json: Option<bool>,
}

/// Parse a config document. Returns None (with a warning) when it does not parse.
pub(crate) fn parse_dropwalk_toml(s: &str, origin: &Path) -> Option<DropwalkToml> {
    toml::from_str(s)
        .map_err(|e| log::warn!("{}: {}", origin.display(), e))
        .ok()
}

/// Load `.dropwalk.toml` from `dir` if present. Returns None if file missing or unreadable. CLI only.
pub(crate) fn load_dropwalk_toml(dir: &Path) -> Option<DropwalkToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_dropwalk_toml(&s, &path)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only set fields present in the file). Call before applying CLI.
pub(crate) fn apply_file_to_opts(file: &DropwalkToml, opts: &mut Opts) {
    let sec = &file.settings;
    apply_file_opt!(sec, opts, max_files => max_files);
    if let Some(ref v) = sec.exclude {
        opts.exclude = v.clone();
    }
    apply_file_opt!(sec, opts, skip_os_junk => skip_os_junk);
    apply_file_opt!(sec, opts, strict => strict);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, protocol => protocol);
    apply_file_opt!(sec, opts, page_size => page_size);
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, print_text => print_text);
    apply_file_opt!(sec, opts, json => json);
}
