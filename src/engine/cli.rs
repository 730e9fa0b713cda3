//! CLI command handler: drop the given paths, dispatch to stdout consumers.

use anyhow::Result;
use log::{debug, warn};
use serde_json::json;
use std::path::Path;

use crate::engine::arg_parser::Cli;
use crate::source::LocalDrop;
use crate::utils::{Colors, apply_file_to_opts, load_dropwalk_toml, max_files_override, setup_logging};
use crate::{DispatchSummary, DropOpts, FileMeta, ObjectUrls, Opts, Revoker, harvest_drop};

/// Overwrite opts field from the CLI when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults → `.dropwalk.toml` in `config_dir` → `DROPWALK_MAX_FILES` → CLI flags.
pub fn setup_opts(cli: &Cli, config_dir: &Path) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = load_dropwalk_toml(config_dir) {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(n) = max_files_override(config_dir) {
        opts.max_files = n;
    }
    apply_cli_opt!(cli, opts, max_files => max_files);
    apply_cli_opt!(cli, opts, protocol => protocol);
    apply_cli_opt!(cli, opts, page_size => page_size);
    apply_cli_opt!(cli, opts, follow_links => follow_links);
    apply_cli_opt!(cli, opts, skip_junk => skip_os_junk);
    apply_cli_opt!(cli, opts, strict => strict);
    apply_cli_opt!(cli, opts, verbose => verbose);
    apply_cli_opt!(cli, opts, print => print_text);
    apply_cli_opt!(cli, opts, json => json);
    if !cli.exclude.is_empty() {
        opts.exclude = cli.exclude.clone();
    }
    opts
}

fn print_text(text: String, meta: &FileMeta, opts: &Opts) {
    if opts.json {
        println!(
            "{}",
            json!({ "kind": "text", "file": meta, "chars": text.chars().count() })
        );
    } else if opts.print_text {
        println!("{}", Colors::colorize(Colors::TEXT, &format!("==> {} <==", meta.full_path)));
        println!("{text}");
    } else {
        println!(
            "{} {} ({}, {} bytes, {} chars)",
            Colors::colorize(Colors::TEXT, "TEXT "),
            meta.full_path,
            if meta.content_kind.is_empty() { "unknown" } else { meta.content_kind.as_str() },
            meta.size,
            text.chars().count()
        );
    }
}

/// The CLI only reports the reference, so it releases it right away.
fn print_image(name: &str, url: String, revoker: Revoker, opts: &Opts) {
    if opts.json {
        println!("{}", json!({ "kind": "image", "name": name, "url": url }));
    } else {
        println!("{} {} -> {}", Colors::colorize(Colors::IMAGE, "IMAGE"), name, url);
    }
    revoker.revoke();
}

fn print_summary(summary: &DispatchSummary) {
    println!(
        "{} | {} | {}",
        Colors::colorize(Colors::TEXT, &format!("Text: {}", summary.text)),
        Colors::colorize(Colors::IMAGE, &format!("Images: {}", summary.images)),
        Colors::colorize(Colors::IGNORED, &format!("Ignored: {}", summary.ignored))
    );
}

/// Drop every path in `cli.paths` (in order) and dispatch the harvest.
pub async fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli, Path::new("."));
    setup_logging(opts.verbose);

    let mut items = Vec::with_capacity(cli.paths.len());
    for path in &cli.paths {
        let item = LocalDrop::from_path(path, opts.protocol)
            .await?
            .with_page_size(opts.page_size)
            .with_follow_links(opts.follow_links);
        items.push(item);
    }
    debug!("dropping {} item(s) via {:?}", items.len(), opts.protocol);

    let urls = ObjectUrls::new();
    let (report, summary) = harvest_drop(
        &items,
        &DropOpts::from(&opts),
        |text, meta| {
            print_text(text, meta, &opts);
            Ok(())
        },
        Some(|name: &str, url: String, revoker: Revoker| {
            print_image(name, url, revoker, &opts);
            Ok(())
        }),
        &urls,
    )
    .await?;

    if report.hit_budget() {
        warn!(
            "Drop exceeded the {} file budget: {} file(s) and {} item(s) left out",
            opts.max_files, report.truncated, report.items_skipped
        );
    }
    if !opts.json {
        print_summary(&summary);
    }
    Ok(())
}
