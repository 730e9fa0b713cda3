//! Public and internal types for the dropwalk API and pipeline.

use std::fmt;
use std::rc::Rc;

use crate::source::{ByteSource, Protocol, RawFile};
use crate::utils::config::{LEGACY_PAGE_SIZE, MAX_DROP_FILES};

/// Normalized record for one harvested leaf file.
#[derive(Clone)]
pub struct HarvestedFile {
    pub name: String,
    /// Path relative to the dropped root, or the file's own name when the protocol has no path.
    pub full_path: String,
    pub content_kind: String,
    pub size: u64,
    pub source: Rc<dyn ByteSource>,
}

impl HarvestedFile {
    /// Stamp `full_path` onto a platform file. An empty path falls back to the file name.
    pub fn from_raw(raw: RawFile, full_path: &str) -> Self {
        let full_path = if full_path.is_empty() {
            raw.name.clone()
        } else {
            full_path.to_string()
        };
        Self {
            name: raw.name,
            full_path,
            content_kind: raw.content_kind,
            size: raw.size,
            source: raw.source,
        }
    }

    pub fn meta(&self) -> FileMeta {
        FileMeta {
            name: self.name.clone(),
            full_path: self.full_path.clone(),
            content_kind: self.content_kind.clone(),
            size: self.size,
        }
    }
}

impl fmt::Debug for HarvestedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarvestedFile")
            .field("name", &self.name)
            .field("full_path", &self.full_path)
            .field("content_kind", &self.content_kind)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Metadata handed to the text consumer alongside the decoded text.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FileMeta {
    pub name: String,
    pub full_path: String,
    pub content_kind: String,
    pub size: u64,
}

/// How a harvested file is routed. Derived from declared content kind and name only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Classification {
    Image,
    Text,
    Ignored,
}

/// Counters for one dispatch pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub text: usize,
    pub images: usize,
    pub ignored: usize,
}

/// Lib-only options for [`harvest_drop`](crate::harvest_drop) and [`ingest`](crate::pipeline::ingest).
#[derive(Clone, Debug)]
pub struct DropOpts {
    /// Maximum harvested files per drop event.
    pub max_files: usize,
    /// Exclude patterns (glob syntax, e.g. `node_modules`, `*.log`), applied to discovered children.
    pub exclude: Vec<String>,
    /// Skip OS metadata files (`.DS_Store`, `Thumbs.db`, `__MACOSX`, ...) found during traversal.
    pub skip_os_junk: bool,
    /// Strict mode: fail on the first abandoned subtree instead of skipping it.
    pub strict: bool,
}

impl Default for DropOpts {
    fn default() -> Self {
        Self {
            max_files: MAX_DROP_FILES,
            exclude: Vec::new(),
            skip_os_junk: false,
            strict: false,
        }
    }
}

impl From<&Opts> for DropOpts {
    fn from(o: &Opts) -> Self {
        DropOpts {
            max_files: o.max_files,
            exclude: o.exclude.clone(),
            skip_os_junk: o.skip_os_junk,
            strict: o.strict,
        }
    }
}

/// Full options (CLI). Use [`DropOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    pub max_files: usize,
    pub exclude: Vec<String>,
    pub skip_os_junk: bool,
    pub strict: bool,
    /// Debug logging and per-path skip details.
    pub verbose: bool,
    /// Which capabilities the simulated drop items expose.
    pub protocol: Protocol,
    /// Children per legacy listing page.
    pub page_size: usize,
    /// Follow symbolic links to directories inside dropped folders.
    pub follow_links: bool,
    /// Print decoded text instead of a one-line summary per text file.
    pub print_text: bool,
    /// Emit one JSON object per dispatched file.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            max_files: MAX_DROP_FILES,
            exclude: Vec::new(),
            skip_os_junk: true,
            strict: false,
            verbose: false,
            protocol: Protocol::Auto,
            page_size: LEGACY_PAGE_SIZE,
            follow_links: false,
            print_text: false,
            json: false,
        }
    }
}
