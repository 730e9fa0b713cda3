//! Local-filesystem implementations of both drop protocols.
//!
//! Used by the CLI to simulate a drop of local paths, and by tests for real trees. All I/O goes
//! through `tokio::fs`, so listing pages, child iteration and byte reads are real suspension points.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::utils::config::LEGACY_PAGE_SIZE;

use super::{
    ByteSource, DroppedItem, FileSystemHandle, HandleIterator, HandleKind, LegacyDirectoryReader,
    LegacyEntry, RawFile,
};

/// Which capabilities a [`LocalDrop`] exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Expose every capability (the coordinator picks the handle protocol first).
    #[default]
    Auto,
    Handle,
    Legacy,
    Raw,
}

/// Byte handle backed by a file on disk.
#[derive(Debug)]
pub struct LocalSource {
    path: PathBuf,
}

impl LocalSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait(?Send)]
impl ByteSource for LocalSource {
    async fn bytes(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("read {}", self.path.display()))
    }
}

/// Media type guessed from the file extension; empty when unknown.
pub fn guess_content_kind(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default()
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn raw_file_at(path: &Path) -> Result<RawFile> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("stat {}", path.display()))?;
    Ok(RawFile {
        name: file_name_of(path),
        content_kind: guess_content_kind(path),
        size: meta.len(),
        source: Rc::new(LocalSource::new(path)),
    })
}

/// Symlink policy for one drop item's walk, shared by every entry and handle it spawns.
#[derive(Clone, Debug, Default)]
struct Links {
    follow: bool,
    /// Canonical directories already handed out; only tracked when following.
    visited: Rc<RefCell<HashSet<PathBuf>>>,
}

impl Links {
    fn new(follow: bool, root: &Path) -> Self {
        let links = Self {
            follow,
            ..Default::default()
        };
        if follow {
            links.visited.borrow_mut().insert(root.to_path_buf());
        }
        links
    }

    /// Whether the child at `path` is a directory, or `None` to leave it out.
    ///
    /// Symlinked directories are skipped unless following; when following, a directory whose
    /// canonical path was already seen is skipped so link cycles terminate.
    async fn probe_child(&self, path: &Path) -> Option<bool> {
        let lmeta = match tokio::fs::symlink_metadata(path).await {
            Ok(m) => m,
            Err(e) => {
                debug!("skipping {}: {}", path.display(), e);
                return None;
            }
        };
        let is_link = lmeta.file_type().is_symlink();
        let is_dir = if is_link {
            match tokio::fs::metadata(path).await {
                Ok(m) => m.is_dir(),
                Err(e) => {
                    debug!("skipping broken link {}: {}", path.display(), e);
                    return None;
                }
            }
        } else {
            lmeta.is_dir()
        };
        if !is_dir {
            return Some(false);
        }
        if is_link && !self.follow {
            debug!("not following directory link {}", path.display());
            return None;
        }
        if self.follow {
            let canonical = match tokio::fs::canonicalize(path).await {
                Ok(c) => c,
                Err(e) => {
                    debug!("skipping {}: {}", path.display(), e);
                    return None;
                }
            };
            if !self.visited.borrow_mut().insert(canonical) {
                debug!("already visited {}; skipping", path.display());
                return None;
            }
        }
        Some(true)
    }
}

// ---- Legacy entry protocol ----

struct LocalEntry {
    path: PathBuf,
    name: String,
    full_path: String,
    is_dir: bool,
    page_size: usize,
    links: Links,
}

#[async_trait(?Send)]
impl LegacyEntry for LocalEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    fn is_file(&self) -> bool {
        !self.is_dir
    }

    fn is_directory(&self) -> bool {
        self.is_dir
    }

    fn create_reader(&self) -> Option<Box<dyn LegacyDirectoryReader>> {
        self.is_dir.then(|| {
            Box::new(LocalReader {
                dir: self.path.clone(),
                full_path: self.full_path.clone(),
                page_size: self.page_size,
                links: self.links.clone(),
                read_dir: None,
                done: false,
            }) as Box<dyn LegacyDirectoryReader>
        })
    }

    async fn file(&self) -> Result<RawFile> {
        raw_file_at(&self.path).await
    }
}

/// Pages through a directory `page_size` children at a time.
struct LocalReader {
    dir: PathBuf,
    full_path: String,
    page_size: usize,
    links: Links,
    read_dir: Option<tokio::fs::ReadDir>,
    done: bool,
}

#[async_trait(?Send)]
impl LegacyDirectoryReader for LocalReader {
    async fn read_entries(&mut self) -> Result<Vec<Box<dyn LegacyEntry>>> {
        if self.done {
            return Ok(Vec::new());
        }
        if self.read_dir.is_none() {
            let rd = tokio::fs::read_dir(&self.dir)
                .await
                .with_context(|| format!("list {}", self.dir.display()))?;
            self.read_dir = Some(rd);
        }
        let Some(read_dir) = self.read_dir.as_mut() else {
            return Ok(Vec::new());
        };

        let mut page: Vec<Box<dyn LegacyEntry>> = Vec::new();
        while page.len() < self.page_size {
            let Some(child) = read_dir
                .next_entry()
                .await
                .with_context(|| format!("list {}", self.dir.display()))?
            else {
                self.done = true;
                break;
            };
            let path = child.path();
            let Some(is_dir) = self.links.probe_child(&path).await else {
                continue;
            };
            let name = file_name_of(&path);
            page.push(Box::new(LocalEntry {
                full_path: format!("{}/{}", self.full_path, name),
                name,
                path,
                is_dir,
                page_size: self.page_size,
                links: self.links.clone(),
            }));
        }
        Ok(page)
    }
}

// ---- Handle protocol ----

struct LocalHandle {
    path: PathBuf,
    name: String,
    kind: HandleKind,
    links: Links,
}

#[async_trait(?Send)]
impl FileSystemHandle for LocalHandle {
    fn kind(&self) -> HandleKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn get_file(&self) -> Result<RawFile> {
        raw_file_at(&self.path).await
    }

    async fn entries(&self) -> Result<Box<dyn HandleIterator>> {
        if self.kind != HandleKind::Directory {
            anyhow::bail!("{} is not a directory", self.path.display());
        }
        let read_dir = tokio::fs::read_dir(&self.path)
            .await
            .with_context(|| format!("list {}", self.path.display()))?;
        Ok(Box::new(LocalHandleIter {
            read_dir,
            links: self.links.clone(),
        }))
    }
}

struct LocalHandleIter {
    read_dir: tokio::fs::ReadDir,
    links: Links,
}

#[async_trait(?Send)]
impl HandleIterator for LocalHandleIter {
    async fn next(&mut self) -> Option<Result<Box<dyn FileSystemHandle>>> {
        loop {
            let child = match self.read_dir.next_entry().await {
                Ok(Some(child)) => child,
                Ok(None) => return None,
                Err(e) => return Some(Err(e.into())),
            };
            let path = child.path();
            let Some(is_dir) = self.links.probe_child(&path).await else {
                continue;
            };
            return Some(Ok(Box::new(LocalHandle {
                name: file_name_of(&path),
                kind: if is_dir {
                    HandleKind::Directory
                } else {
                    HandleKind::File
                },
                path,
                links: self.links.clone(),
            })));
        }
    }
}

// ---- Dropped item ----

/// A local path presented as a dropped item, exposing the capabilities chosen by [`Protocol`].
#[derive(Clone, Debug)]
pub struct LocalDrop {
    path: PathBuf,
    name: String,
    is_dir: bool,
    size: u64,
    protocol: Protocol,
    page_size: usize,
    follow_links: bool,
}

impl LocalDrop {
    /// Canonicalize `path` and stat it once. The dropped path itself is always resolved,
    /// even when it is a link; [`with_follow_links`](Self::with_follow_links) governs links found inside.
    pub async fn from_path(path: &Path, protocol: Protocol) -> Result<Self> {
        let path = tokio::fs::canonicalize(path)
            .await
            .with_context(|| format!("canonicalize {}", path.display()))?;
        let meta = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("stat {}", path.display()))?;
        Ok(Self {
            name: file_name_of(&path),
            is_dir: meta.is_dir(),
            size: meta.len(),
            path,
            protocol,
            page_size: LEGACY_PAGE_SIZE,
            follow_links: false,
        })
    }

    /// Children per legacy listing page (min 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Descend into symlinked directories found while walking. Off by default.
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn exposes(&self, protocol: Protocol) -> bool {
        self.protocol == Protocol::Auto || self.protocol == protocol
    }
}

#[async_trait(?Send)]
impl DroppedItem for LocalDrop {
    async fn file_system_handle(&self) -> Option<Result<Box<dyn FileSystemHandle>>> {
        if !self.exposes(Protocol::Handle) {
            return None;
        }
        let kind = if self.is_dir {
            HandleKind::Directory
        } else {
            HandleKind::File
        };
        Some(Ok(Box::new(LocalHandle {
            path: self.path.clone(),
            name: self.name.clone(),
            kind,
            links: Links::new(self.follow_links, &self.path),
        })))
    }

    fn legacy_entry(&self) -> Option<Box<dyn LegacyEntry>> {
        if !self.exposes(Protocol::Legacy) {
            return None;
        }
        Some(Box::new(LocalEntry {
            path: self.path.clone(),
            name: self.name.clone(),
            full_path: format!("/{}", self.name),
            is_dir: self.is_dir,
            page_size: self.page_size,
            links: Links::new(self.follow_links, &self.path),
        }))
    }

    /// Directories have no raw file form.
    fn raw_file(&self) -> Option<RawFile> {
        if !self.exposes(Protocol::Raw) || self.is_dir {
            return None;
        }
        Some(RawFile {
            name: self.name.clone(),
            content_kind: guess_content_kind(&self.path),
            size: self.size,
            source: Rc::new(LocalSource::new(&self.path)),
        })
    }
}
