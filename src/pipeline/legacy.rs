//! Breadth-first harvest over the legacy entry protocol (paginated directory readers).

use anyhow::{Context, Result};
use log::debug;
use std::collections::VecDeque;

use crate::HarvestedFile;
use crate::engine::tools::{ChildFilter, relative_full_path};
use crate::source::LegacyEntry;

use super::walk::{Expansion, Room, SkippedSubtree, WalkReport};

/// Walk `root` breadth-first and return at most `limit` leaf files.
///
/// Directories are listed page by page until a page comes back empty. Listing stops early once
/// the files collected plus the files already queued reach `limit`. A rejected page abandons the
/// rest of that directory; siblings and already-enqueued children still process.
/// Leaf conversion (`file()`) errors propagate.
pub async fn traverse_legacy(
    root: Box<dyn LegacyEntry>,
    limit: usize,
    filter: &ChildFilter,
) -> Result<WalkReport> {
    let mut report = WalkReport::default();
    let mut room = Room::new(limit);
    let mut queue: VecDeque<Box<dyn LegacyEntry>> = VecDeque::new();
    if root.is_file() {
        room.queue_file();
    }
    queue.push_back(root);

    let mut leaves: Vec<Box<dyn LegacyEntry>> = Vec::new();
    while !room.limit_reached() {
        let Some(entry) = queue.pop_front() else {
            break;
        };
        if entry.is_file() {
            room.collect_file();
            leaves.push(entry);
        } else if entry.is_directory() {
            let expansion = expand_directory(entry.as_ref(), &mut queue, &mut room, filter).await;
            report.record(expansion);
        }
    }
    debug!(
        "legacy walk: {} files, {} abandoned directories",
        leaves.len(),
        report.skipped.len()
    );

    report.files = materialize(leaves).await?;
    Ok(report)
}

/// Drain one directory's reader into the queue, page by page.
async fn expand_directory(
    dir: &dyn LegacyEntry,
    queue: &mut VecDeque<Box<dyn LegacyEntry>>,
    room: &mut Room,
    filter: &ChildFilter,
) -> Expansion {
    let Some(mut reader) = dir.create_reader() else {
        return Expansion::Complete;
    };
    while !room.is_full() {
        let page = match reader.read_entries().await {
            Ok(page) => page,
            Err(e) => {
                return Expansion::Abandoned(SkippedSubtree {
                    path: relative_full_path(dir.full_path()).to_string(),
                    msg: format!("{e:#}"),
                });
            }
        };
        if page.is_empty() {
            break;
        }
        for child in page {
            if room.is_full() {
                break;
            }
            if !filter.is_noop()
                && !filter.should_include_child(
                    child.name(),
                    relative_full_path(child.full_path()),
                    child.is_directory(),
                )
            {
                continue;
            }
            if child.is_file() {
                room.queue_file();
            }
            queue.push_back(child);
        }
    }
    Expansion::Complete
}

/// Acquire each leaf's file object and stamp its relative path.
async fn materialize(leaves: Vec<Box<dyn LegacyEntry>>) -> Result<Vec<HarvestedFile>> {
    let mut files = Vec::with_capacity(leaves.len());
    for entry in leaves {
        let raw = entry
            .file()
            .await
            .with_context(|| format!("open dropped file {}", entry.full_path()))?;
        files.push(HarvestedFile::from_raw(
            raw,
            relative_full_path(entry.full_path()),
        ));
    }
    Ok(files)
}
