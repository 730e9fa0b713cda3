//! Drop-source protocols: what a dropped item can expose and how its tree is enumerated.
//!
//! Two directory protocols exist side by side:
//! - the **legacy entry protocol** ([`LegacyEntry`]): boolean file/directory predicates and a
//!   paginated [`LegacyDirectoryReader`] that must be drained until it returns an empty page;
//! - the **handle protocol** ([`FileSystemHandle`]): a [`HandleKind`] discriminator and an async
//!   child iterator ([`HandleIterator`]).
//!
//! All traits are `?Send`: a drop is harvested on one thread, every `await` is a suspension point.

pub mod local;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::rc::Rc;

pub use local::{LocalDrop, LocalSource, Protocol};

/// Opaque read handle behind a file. Bytes are only pulled when a consumer needs them.
#[async_trait(?Send)]
pub trait ByteSource {
    async fn bytes(&self) -> Result<Vec<u8>>;
}

/// The platform's file object: declared metadata plus its byte handle.
#[derive(Clone)]
pub struct RawFile {
    pub name: String,
    /// Declared media type (e.g. `text/plain`). May be empty when the platform does not know.
    pub content_kind: String,
    pub size: u64,
    pub source: Rc<dyn ByteSource>,
}

impl fmt::Debug for RawFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("content_kind", &self.content_kind)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

// ---- Legacy entry protocol ----

/// Node of the legacy entry protocol.
#[async_trait(?Send)]
pub trait LegacyEntry {
    fn name(&self) -> &str;
    /// Slash-rooted path relative to the drop (`/dir/b.txt`). May be empty.
    fn full_path(&self) -> &str;
    fn is_file(&self) -> bool;
    fn is_directory(&self) -> bool;
    /// Paginated child listing. `None` for files.
    fn create_reader(&self) -> Option<Box<dyn LegacyDirectoryReader>>;
    /// Acquire the file object behind a file entry.
    async fn file(&self) -> Result<RawFile>;
}

/// Paginated directory listing. Pages have provider-chosen size; an empty page ends the listing.
#[async_trait(?Send)]
pub trait LegacyDirectoryReader {
    async fn read_entries(&mut self) -> Result<Vec<Box<dyn LegacyEntry>>>;
}

// ---- Handle protocol ----

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
    File,
    Directory,
}

/// Node of the handle protocol.
#[async_trait(?Send)]
pub trait FileSystemHandle {
    fn kind(&self) -> HandleKind;
    fn name(&self) -> &str;
    async fn get_file(&self) -> Result<RawFile>;
    /// Start iterating a directory's children.
    async fn entries(&self) -> Result<Box<dyn HandleIterator>>;
}

/// Async iteration over a directory handle's children, one suspension per child.
#[async_trait(?Send)]
pub trait HandleIterator {
    async fn next(&mut self) -> Option<Result<Box<dyn FileSystemHandle>>>;
}

// ---- Dropped items ----

/// One item offered by a drop event. Each capability defaults to "not exposed";
/// an item may expose any subset, probed handle → legacy entry → raw file.
#[async_trait(?Send)]
pub trait DroppedItem {
    /// Handle accessor. `None`: not exposed (or the platform returned no handle).
    /// `Some(Err)`: acquisition failed and the next capability should be tried.
    async fn file_system_handle(&self) -> Option<Result<Box<dyn FileSystemHandle>>> {
        None
    }

    fn legacy_entry(&self) -> Option<Box<dyn LegacyEntry>> {
        None
    }

    fn raw_file(&self) -> Option<RawFile> {
        None
    }
}

/// Lets a drop mix item types as `Vec<Box<dyn DroppedItem>>`.
#[async_trait(?Send)]
impl<T: DroppedItem + ?Sized> DroppedItem for Box<T> {
    async fn file_system_handle(&self) -> Option<Result<Box<dyn FileSystemHandle>>> {
        (**self).file_system_handle().await
    }

    fn legacy_entry(&self) -> Option<Box<dyn LegacyEntry>> {
        (**self).legacy_entry()
    }

    fn raw_file(&self) -> Option<RawFile> {
        (**self).raw_file()
    }
}
