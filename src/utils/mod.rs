pub mod config;
pub mod dropwalk_toml;
pub mod env_override;
pub mod logger;

pub use config::*;
pub(crate) use dropwalk_toml::{apply_file_to_opts, load_dropwalk_toml};
pub use env_override::max_files_override;
pub use logger::{Colors, setup_logging};
