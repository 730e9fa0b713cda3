//! Budget override from the environment: env var → .env in dir.

use log::{debug, warn};
use std::path::Path;

use crate::utils::config::PackagePaths;

fn parse_max_files(key: &str, raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => {
            warn!("{key}={raw:?} is not a positive integer; ignoring");
            None
        }
        Ok(n) => Some(n),
    }
}

fn try_env(key: &str) -> Option<usize> {
    let s = std::env::var(key).ok()?;
    if s.trim().is_empty() {
        return None;
    }
    parse_max_files(key, &s)
}

/// Read the budget override: `DROPWALK_MAX_FILES` from the environment, then from `.env` in `dir`.
pub fn max_files_override(dir: &Path) -> Option<usize> {
    let key = PackagePaths::get().env_max_files();
    if let Some(n) = try_env(key) {
        debug!("{key}={n} from environment");
        return Some(n);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Some(n) = try_env(key) {
            debug!("{key}={n} from {}", env_path.display());
            return Some(n);
        }
    }
    None
}
