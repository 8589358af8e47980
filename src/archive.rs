use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::Config;
use crate::playlist::StreamEntry;

/// Load the url → entry archive. A missing or unreadable file is treated as
/// an empty archive so a bad deploy never blocks a run.
pub fn load(path: &Path) -> BTreeMap<String, StreamEntry> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return BTreeMap::new(),
    };
    match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            warn!("Archive {} is corrupt, starting fresh: {}", path.display(), e);
            BTreeMap::new()
        }
    }
}

/// Merge new entries into the archive, overwriting on URL collision, and
/// rewrite the full mapping. Returns the total unique count.
pub fn update(cfg: &Config, entries: &[StreamEntry]) -> Result<usize> {
    let path = cfg.archive_path();
    let mut map = load(&path);
    for entry in entries {
        map.insert(entry.url.clone(), entry.clone());
    }

    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("Failed to create {}", cfg.output_dir.display()))?;
    let json = serde_json::to_string_pretty(&map).context("Failed to encode archive")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write archive {}", path.display()))?;

    Ok(map.len())
}
