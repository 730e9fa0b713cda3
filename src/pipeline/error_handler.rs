use anyhow::Result;
use log::{debug, warn};

use super::walk::SkippedSubtree;

/// Check a walk's abandoned subtrees: in strict mode the first one is an error; otherwise log them.
pub fn check_for_skipped_subtrees(strict: bool, skipped: &[SkippedSubtree]) -> Result<()> {
    let Some(first) = skipped.first() else {
        return Ok(());
    };
    if strict {
        anyhow::bail!("strict mode: could not list {}", first);
    }
    warn!(
        "Skipped {} director{} that could not be listed",
        skipped.len(),
        if skipped.len() == 1 { "y" } else { "ies" }
    );
    for s in skipped {
        debug!("  skipped: {}", s);
    }
    Ok(())
}
