//! Breadth-first harvest over the handle protocol (kind discriminator + async child iteration).

use anyhow::{Context, Result};
use log::debug;
use std::collections::VecDeque;

use crate::HarvestedFile;
use crate::engine::tools::{ChildFilter, join_rel};
use crate::source::{FileSystemHandle, HandleKind};

use super::walk::{Expansion, Room, SkippedSubtree, WalkReport};

/// Queued handle with its path relative to the dropped root (used for filtering and reporting).
type Queued = (Box<dyn FileSystemHandle>, String);

/// Walk `root` breadth-first and return at most `limit` leaf files.
///
/// Same queue and budget rules as [`traverse_legacy`](super::traverse_legacy). A harvested file's
/// `full_path` is the handle's own name: this protocol exposes no relative path.
pub async fn traverse_handles(
    root: Box<dyn FileSystemHandle>,
    limit: usize,
    filter: &ChildFilter,
) -> Result<WalkReport> {
    let mut report = WalkReport::default();
    let mut room = Room::new(limit);
    let mut queue: VecDeque<Queued> = VecDeque::new();
    if root.kind() == HandleKind::File {
        room.queue_file();
    }
    let root_path = root.name().to_string();
    queue.push_back((root, root_path));

    let mut leaves: Vec<Box<dyn FileSystemHandle>> = Vec::new();
    while !room.limit_reached() {
        let Some((handle, rel)) = queue.pop_front() else {
            break;
        };
        match handle.kind() {
            HandleKind::File => {
                room.collect_file();
                leaves.push(handle);
            }
            HandleKind::Directory => {
                let expansion =
                    expand_directory(handle.as_ref(), &rel, &mut queue, &mut room, filter).await;
                report.record(expansion);
            }
        }
    }
    debug!(
        "handle walk: {} files, {} abandoned directories",
        leaves.len(),
        report.skipped.len()
    );

    let mut files = Vec::with_capacity(leaves.len());
    for handle in leaves {
        let raw = handle
            .get_file()
            .await
            .with_context(|| format!("open dropped file {}", handle.name()))?;
        files.push(HarvestedFile::from_raw(raw, handle.name()));
    }
    report.files = files;
    Ok(report)
}

/// Iterate one directory's children into the queue.
async fn expand_directory(
    dir: &dyn FileSystemHandle,
    rel: &str,
    queue: &mut VecDeque<Queued>,
    room: &mut Room,
    filter: &ChildFilter,
) -> Expansion {
    let abandon = |e: anyhow::Error| {
        Expansion::Abandoned(SkippedSubtree {
            path: rel.to_string(),
            msg: format!("{e:#}"),
        })
    };
    if room.is_full() {
        return Expansion::Complete;
    }
    let mut children = match dir.entries().await {
        Ok(children) => children,
        Err(e) => return abandon(e),
    };
    while !room.is_full() {
        let child = match children.next().await {
            Some(Ok(child)) => child,
            Some(Err(e)) => return abandon(e),
            None => break,
        };
        let is_dir = child.kind() == HandleKind::Directory;
        let child_rel = join_rel(rel, child.name());
        if !filter.is_noop() && !filter.should_include_child(child.name(), &child_rel, is_dir) {
            continue;
        }
        if !is_dir {
            room.queue_file();
        }
        queue.push_back((child, child_rel));
    }
    Expansion::Complete
}
