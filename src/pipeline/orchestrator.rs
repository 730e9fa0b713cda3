use anyhow::Result;
use log::debug;

use crate::engine::budget::TraversalBudget;
use crate::engine::tools::ChildFilter;
use crate::source::{DroppedItem, Protocol};
use crate::{DropOpts, HarvestedFile};

use super::error_handler::check_for_skipped_subtrees;
use super::handle::traverse_handles;
use super::legacy::traverse_legacy;
use super::walk::{SkippedSubtree, WalkReport};

/// How one dropped item was harvested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Position in the drop's declaration order.
    pub index: usize,
    /// Capability used, or `None` when the item exposed nothing usable.
    pub via: Option<Protocol>,
    /// Files kept after budget admission.
    pub files: usize,
}

/// Bookkeeping for one [`ingest_report`] call.
#[derive(Clone, Debug, Default)]
pub struct IngestReport {
    pub items: Vec<ItemOutcome>,
    /// Items never probed because the budget was already spent.
    pub items_skipped: usize,
    /// Files dropped at admission because they did not fit the budget.
    pub truncated: usize,
    pub skipped_subtrees: Vec<SkippedSubtree>,
}

impl IngestReport {
    /// True when the budget cut anything off (later items or files of the last item).
    pub fn hit_budget(&self) -> bool {
        self.items_skipped > 0 || self.truncated > 0
    }
}

/// Harvest every dropped item into a flat list of at most `opts.max_files` files.
pub async fn ingest<I: DroppedItem>(items: &[I], opts: &DropOpts) -> Result<Vec<HarvestedFile>> {
    let (files, _) = ingest_report(items, opts).await?;
    Ok(files)
}

/// [`ingest`], also returning per-item outcomes and abandoned subtrees.
///
/// Items are handled strictly in declaration order. Once the budget is spent, remaining items are
/// skipped without probing any capability.
pub async fn ingest_report<I: DroppedItem>(
    items: &[I],
    opts: &DropOpts,
) -> Result<(Vec<HarvestedFile>, IngestReport)> {
    let filter = ChildFilter::new(&opts.exclude, opts.skip_os_junk);
    let mut budget = TraversalBudget::new(opts.max_files);
    let mut report = IngestReport::default();
    let mut files = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if budget.is_exhausted() {
            report.items_skipped = items.len() - index;
            debug!(
                "budget of {} spent; skipping {} remaining item(s)",
                budget.max(),
                report.items_skipped
            );
            break;
        }
        let Some((via, walk)) = expand_item(item, budget.remaining(), &filter).await? else {
            debug!("item {index}: no usable capability; skipped");
            report.items.push(ItemOutcome {
                index,
                via: None,
                files: 0,
            });
            continue;
        };
        check_for_skipped_subtrees(opts.strict, &walk.skipped)?;

        let WalkReport {
            files: mut item_files,
            skipped,
        } = walk;
        report.truncated += budget.admit(&mut item_files);
        debug!(
            "item {index}: {} file(s) via {:?}, {}/{} budget used",
            item_files.len(),
            via,
            budget.used(),
            budget.max()
        );
        report.items.push(ItemOutcome {
            index,
            via: Some(via),
            files: item_files.len(),
        });
        report.skipped_subtrees.extend(skipped);
        files.append(&mut item_files);
    }
    Ok((files, report))
}

/// Probe one item's capabilities in priority order and walk the first usable one.
/// A failed handle acquisition falls through to the legacy entry.
async fn expand_item<I: DroppedItem>(
    item: &I,
    limit: usize,
    filter: &ChildFilter,
) -> Result<Option<(Protocol, WalkReport)>> {
    if let Some(acquired) = item.file_system_handle().await {
        match acquired {
            Ok(handle) => {
                let walk = traverse_handles(handle, limit, filter).await?;
                return Ok(Some((Protocol::Handle, walk)));
            }
            Err(e) => debug!("handle acquisition failed, trying legacy entry: {e:#}"),
        }
    }
    if let Some(entry) = item.legacy_entry() {
        let walk = traverse_legacy(entry, limit, filter).await?;
        return Ok(Some((Protocol::Legacy, walk)));
    }
    if let Some(raw) = item.raw_file() {
        let name = raw.name.clone();
        return Ok(Some((
            Protocol::Raw,
            WalkReport::single(HarvestedFile::from_raw(raw, &name)),
        )));
    }
    Ok(None)
}
