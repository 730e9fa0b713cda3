//! Dropwalk: drop-target ingestion engine with content-aware dispatch

pub mod engine;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use pipeline::{IngestReport, ObjectUrls, Revoker};

use log::debug;

use crate::pipeline::{dispatch, ingest_report};
use crate::source::DroppedItem;

/// Result alias used by public dropwalk API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point for one drop event: harvest `items`, then dispatch every harvested file in order.
///
/// - Harvest: items in declaration order, each through the first usable capability
///   (handle → legacy entry → raw file), capped at `opts.max_files` files across the whole drop.
/// - Dispatch: text files are decoded and passed to `on_text`; images become object URLs in `urls`
///   and are passed to `on_image` with their [`Revoker`]. Pass `None::<pipeline::NoImages>` to skip images.
///
/// A failure to open a harvested file or any consumer error aborts the call.
pub async fn harvest_drop<D, T, I>(
    items: &[D],
    opts: &DropOpts,
    on_text: T,
    on_image: Option<I>,
    urls: &ObjectUrls,
) -> Result<(IngestReport, DispatchSummary)>
where
    D: DroppedItem,
    T: FnMut(String, &FileMeta) -> Result<()>,
    I: FnMut(&str, String, Revoker) -> Result<()>,
{
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let (files, report) = ingest_report(items, opts).await?;
    let summary = dispatch(files, on_text, on_image, urls).await?;
    Ok((report, summary))
}
