//! Engine module: classification, budget, filters and CLI handling

pub mod arg_parser;
pub mod budget;
pub mod classify;
pub mod cli;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use budget::TraversalBudget;
pub use classify::{classify, classify_parts, is_image_extension, is_text_extension};
pub use cli::handle_run;
pub use tools::{ChildFilter, extension_of, glob_match, is_os_junk, join_rel, relative_full_path};
