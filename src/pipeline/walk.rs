//! Shared walk types: per-directory expansion outcome and the per-item walk report.

use std::fmt;

use crate::HarvestedFile;

/// Result of expanding one directory. A failed listing abandons only that directory's remaining
/// children; whatever was already enqueued keeps processing.
#[must_use]
pub enum Expansion {
    Complete,
    Abandoned(SkippedSubtree),
}

/// A directory whose listing or iteration failed part-way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSubtree {
    /// Path relative to the dropped root.
    pub path: String,
    pub msg: String,
}

impl fmt::Display for SkippedSubtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.msg)
    }
}

/// Output of walking one dropped item: leaf files in breadth-first order plus abandoned subtrees.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub files: Vec<HarvestedFile>,
    pub skipped: Vec<SkippedSubtree>,
}

impl WalkReport {
    pub fn single(file: HarvestedFile) -> Self {
        Self {
            files: vec![file],
            skipped: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, expansion: Expansion) {
        if let Expansion::Abandoned(skipped) = expansion {
            self.skipped.push(skipped);
        }
    }
}

/// Tracks how many files are collected or already queued so listing can stop once the limit is certain.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Room {
    limit: usize,
    collected: usize,
    queued_files: usize,
}

impl Room {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            collected: 0,
            queued_files: 0,
        }
    }

    /// Queued files always reach the output before anything enqueued after them.
    pub(crate) fn is_full(&self) -> bool {
        self.collected + self.queued_files >= self.limit
    }

    pub(crate) fn limit_reached(&self) -> bool {
        self.collected >= self.limit
    }

    pub(crate) fn queue_file(&mut self) {
        self.queued_files += 1;
    }

    /// A queued file was dequeued into the output.
    pub(crate) fn collect_file(&mut self) {
        self.queued_files = self.queued_files.saturating_sub(1);
        self.collected += 1;
    }
}
