//! In-memory drop sources for tests: one tree model exposed through both protocols,
//! with knobs for page size and injected failures.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use dropwalk::source::{
    ByteSource, DroppedItem, FileSystemHandle, HandleIterator, HandleKind, LegacyDirectoryReader,
    LegacyEntry, RawFile,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub enum Node {
    File {
        name: String,
        kind: String,
        bytes: Vec<u8>,
    },
    Dir {
        name: String,
        children: Vec<Rc<Node>>,
    },
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File { name, .. } | Node::Dir { name, .. } => name,
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self, Node::Dir { .. })
    }
}

pub fn file(name: &str, kind: &str, content: &str) -> Rc<Node> {
    Rc::new(Node::File {
        name: name.to_string(),
        kind: kind.to_string(),
        bytes: content.as_bytes().to_vec(),
    })
}

pub fn text(name: &str, content: &str) -> Rc<Node> {
    file(name, "text/plain", content)
}

pub fn dir(name: &str, children: Vec<Rc<Node>>) -> Rc<Node> {
    Rc::new(Node::Dir {
        name: name.to_string(),
        children,
    })
}

/// Directory holding `n` text files `f0000.txt`, `f0001.txt`, ...
pub fn wide_dir(name: &str, n: usize) -> Rc<Node> {
    dir(
        name,
        (0..n)
            .map(|i| text(&format!("f{i:04}.txt"), "x"))
            .collect(),
    )
}

/// Shared behaviour knobs and call counters for one fake drop.
pub struct Fake {
    pub page_size: usize,
    /// Directory name → zero-based page (legacy) or child index (handle) that fails.
    pub fail_listing: RefCell<HashMap<String, usize>>,
    /// File names whose conversion fails.
    pub fail_files: RefCell<Vec<String>>,
    /// File names whose bytes cannot be read.
    pub fail_bytes: RefCell<Vec<String>>,
    pub pages_read: Cell<usize>,
    pub probes: Cell<usize>,
}

impl Fake {
    pub fn new(page_size: usize) -> Rc<Self> {
        Rc::new(Self {
            page_size,
            fail_listing: RefCell::new(HashMap::new()),
            fail_files: RefCell::new(Vec::new()),
            fail_bytes: RefCell::new(Vec::new()),
            pages_read: Cell::new(0),
            probes: Cell::new(0),
        })
    }

    pub fn fail_listing(&self, dir: &str, at: usize) {
        self.fail_listing.borrow_mut().insert(dir.to_string(), at);
    }

    pub fn fail_file(&self, name: &str) {
        self.fail_files.borrow_mut().push(name.to_string());
    }

    pub fn fail_bytes(&self, name: &str) {
        self.fail_bytes.borrow_mut().push(name.to_string());
    }

    fn raw_file(self: &Rc<Self>, node: &Rc<Node>) -> Result<RawFile> {
        let Node::File { name, kind, bytes } = node.as_ref() else {
            return Err(anyhow!("{} is a directory", node.name()));
        };
        if self.fail_files.borrow().contains(name) {
            return Err(anyhow!("file {name} vanished"));
        }
        Ok(RawFile {
            name: name.clone(),
            content_kind: kind.clone(),
            size: bytes.len() as u64,
            source: Rc::new(MemBytes {
                bytes: bytes.clone(),
                fail: self.fail_bytes.borrow().contains(name),
            }),
        })
    }
}

pub struct MemBytes {
    bytes: Vec<u8>,
    fail: bool,
}

#[async_trait(?Send)]
impl ByteSource for MemBytes {
    async fn bytes(&self) -> Result<Vec<u8>> {
        if self.fail {
            return Err(anyhow!("read failed"));
        }
        Ok(self.bytes.clone())
    }
}

// ---- Legacy entry protocol ----

pub struct MemEntry {
    node: Rc<Node>,
    full_path: String,
    fake: Rc<Fake>,
}

#[async_trait(?Send)]
impl LegacyEntry for MemEntry {
    fn name(&self) -> &str {
        self.node.name()
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    fn is_file(&self) -> bool {
        !self.node.is_dir()
    }

    fn is_directory(&self) -> bool {
        self.node.is_dir()
    }

    fn create_reader(&self) -> Option<Box<dyn LegacyDirectoryReader>> {
        self.node.is_dir().then(|| {
            Box::new(MemReader {
                node: self.node.clone(),
                full_path: self.full_path.clone(),
                fake: self.fake.clone(),
                page: 0,
            }) as Box<dyn LegacyDirectoryReader>
        })
    }

    async fn file(&self) -> Result<RawFile> {
        self.fake.raw_file(&self.node)
    }
}

struct MemReader {
    node: Rc<Node>,
    full_path: String,
    fake: Rc<Fake>,
    page: usize,
}

#[async_trait(?Send)]
impl LegacyDirectoryReader for MemReader {
    async fn read_entries(&mut self) -> Result<Vec<Box<dyn LegacyEntry>>> {
        let Node::Dir { name, children } = self.node.as_ref() else {
            return Ok(Vec::new());
        };
        self.fake.pages_read.set(self.fake.pages_read.get() + 1);
        if self.fake.fail_listing.borrow().get(name) == Some(&self.page) {
            return Err(anyhow!("listing {name} failed"));
        }
        let start = self.page * self.fake.page_size;
        self.page += 1;
        Ok(children
            .iter()
            .skip(start)
            .take(self.fake.page_size)
            .map(|child| {
                Box::new(MemEntry {
                    full_path: format!("{}/{}", self.full_path, child.name()),
                    node: child.clone(),
                    fake: self.fake.clone(),
                }) as Box<dyn LegacyEntry>
            })
            .collect())
    }
}

// ---- Handle protocol ----

pub struct MemHandle {
    node: Rc<Node>,
    fake: Rc<Fake>,
}

#[async_trait(?Send)]
impl FileSystemHandle for MemHandle {
    fn kind(&self) -> HandleKind {
        if self.node.is_dir() {
            HandleKind::Directory
        } else {
            HandleKind::File
        }
    }

    fn name(&self) -> &str {
        self.node.name()
    }

    async fn get_file(&self) -> Result<RawFile> {
        self.fake.raw_file(&self.node)
    }

    async fn entries(&self) -> Result<Box<dyn HandleIterator>> {
        Ok(Box::new(MemIter {
            node: self.node.clone(),
            fake: self.fake.clone(),
            next: 0,
        }))
    }
}

struct MemIter {
    node: Rc<Node>,
    fake: Rc<Fake>,
    next: usize,
}

#[async_trait(?Send)]
impl HandleIterator for MemIter {
    async fn next(&mut self) -> Option<Result<Box<dyn FileSystemHandle>>> {
        let Node::Dir { name, children } = self.node.as_ref() else {
            return None;
        };
        if self.fake.fail_listing.borrow().get(name) == Some(&self.next) {
            return Some(Err(anyhow!("iterating {name} failed")));
        }
        let child = children.get(self.next)?;
        self.next += 1;
        Some(Ok(Box::new(MemHandle {
            node: child.clone(),
            fake: self.fake.clone(),
        })))
    }
}

// ---- Dropped items ----

/// How a [`MemItem`]'s handle probe behaves.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum HandleProbe {
    Absent,
    Present,
    Fails,
}

pub struct MemItem {
    node: Rc<Node>,
    fake: Rc<Fake>,
    handle: HandleProbe,
    legacy: bool,
    raw: bool,
}

impl MemItem {
    /// Item exposing nothing; add capabilities with the builder methods.
    pub fn new(node: Rc<Node>, fake: &Rc<Fake>) -> Self {
        Self {
            node,
            fake: fake.clone(),
            handle: HandleProbe::Absent,
            legacy: false,
            raw: false,
        }
    }

    pub fn handle(mut self, probe: HandleProbe) -> Self {
        self.handle = probe;
        self
    }

    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Every capability, as a modern browser offers.
    pub fn all(node: Rc<Node>, fake: &Rc<Fake>) -> Self {
        Self::new(node, fake)
            .handle(HandleProbe::Present)
            .legacy()
            .raw()
    }

    fn probe(&self) {
        self.fake.probes.set(self.fake.probes.get() + 1);
    }
}

#[async_trait(?Send)]
impl DroppedItem for MemItem {
    async fn file_system_handle(&self) -> Option<Result<Box<dyn FileSystemHandle>>> {
        self.probe();
        match self.handle {
            HandleProbe::Absent => None,
            HandleProbe::Fails => Some(Err(anyhow!("handle acquisition rejected"))),
            HandleProbe::Present => Some(Ok(Box::new(MemHandle {
                node: self.node.clone(),
                fake: self.fake.clone(),
            }))),
        }
    }

    fn legacy_entry(&self) -> Option<Box<dyn LegacyEntry>> {
        self.probe();
        self.legacy.then(|| {
            Box::new(MemEntry {
                full_path: format!("/{}", self.node.name()),
                node: self.node.clone(),
                fake: self.fake.clone(),
            }) as Box<dyn LegacyEntry>
        })
    }

    fn raw_file(&self) -> Option<RawFile> {
        self.probe();
        if !self.raw {
            return None;
        }
        self.fake.raw_file(&self.node).ok()
    }
}

pub fn paths(files: &[dropwalk::HarvestedFile]) -> Vec<String> {
    files.iter().map(|f| f.full_path.clone()).collect()
}

/// Legacy root entry for a bare tree, for driving the walker directly.
pub fn legacy_root(fake: &Rc<Fake>, node: Rc<Node>) -> Box<dyn LegacyEntry> {
    Box::new(MemEntry {
        full_path: format!("/{}", node.name()),
        node,
        fake: fake.clone(),
    })
}

/// Root handle for a bare tree, for driving the walker directly.
pub fn handle_root(fake: &Rc<Fake>, node: Rc<Node>) -> Box<dyn FileSystemHandle> {
    Box::new(MemHandle {
        node,
        fake: fake.clone(),
    })
}
