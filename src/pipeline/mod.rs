//! Pipeline components: protocol walkers, ingestion coordinator, payload dispatch.

pub mod dispatch;
pub mod error_handler;
pub mod handle;
pub mod legacy;
pub mod object_url;
pub mod orchestrator;
pub mod walk;

pub use dispatch::{NoImages, dispatch};
pub use error_handler::check_for_skipped_subtrees;
pub use handle::traverse_handles;
pub use legacy::traverse_legacy;
pub use object_url::{ObjectUrls, Revoker};
pub use orchestrator::{IngestReport, ItemOutcome, ingest, ingest_report};
pub use walk::{Expansion, SkippedSubtree, WalkReport};
