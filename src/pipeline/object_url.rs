//! Revocable object references handed to image consumers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::source::ByteSource;
use crate::utils::config::PackagePaths;

#[derive(Default)]
struct UrlTable {
    next_id: u64,
    live: HashMap<String, Rc<dyn ByteSource>>,
}

/// Session-scoped registry of object URLs (`blob:dropwalk/<n>`).
///
/// Each URL keeps its byte source alive until its [`Revoker`] runs. Outlives individual drops;
/// URLs that are never revoked stay registered for the life of the registry.
#[derive(Clone, Default)]
pub struct ObjectUrls {
    table: Rc<RefCell<UrlTable>>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` and return its URL plus the release handle.
    pub fn create(&self, source: Rc<dyn ByteSource>) -> (String, Revoker) {
        let mut table = self.table.borrow_mut();
        let url = format!("{}{}", PackagePaths::get().url_prefix(), table.next_id);
        table.next_id += 1;
        table.live.insert(url.clone(), source);
        let revoker = Revoker {
            url: url.clone(),
            table: Rc::downgrade(&self.table),
        };
        (url, revoker)
    }

    /// Byte source behind a live URL.
    pub fn resolve(&self, url: &str) -> Option<Rc<dyn ByteSource>> {
        self.table.borrow().live.get(url).cloned()
    }

    /// Number of URLs not yet revoked.
    pub fn live(&self) -> usize {
        self.table.borrow().live.len()
    }
}

impl fmt::Debug for ObjectUrls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrls")
            .field("live", &self.live())
            .finish()
    }
}

/// Release handle for one object URL. Consumed by [`revoke`](Self::revoke), so it runs at most once.
#[must_use = "an object URL is released only when its Revoker is revoked"]
pub struct Revoker {
    url: String,
    table: Weak<RefCell<UrlTable>>,
}

impl Revoker {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Release the URL. A no-op if the registry is already gone.
    pub fn revoke(self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().live.remove(&self.url);
        }
    }
}

impl fmt::Debug for Revoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Revoker").field(&self.url).finish()
    }
}
