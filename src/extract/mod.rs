pub mod filter;
pub mod label;
pub mod scan;

use std::collections::HashSet;

use tracing::debug;

use crate::config::Config;
use crate::fetch::RawPage;
use crate::playlist::{MediaType, StreamEntry};

/// Three-pass pipeline: page text → candidates → filtered, labelled entries.
/// URLs are deduplicated first-seen-wins within the page; cross-page dedupe
/// happens later over the combined run.
pub fn process_page(cfg: &Config, page: &RawPage) -> Vec<StreamEntry> {
    let candidates = scan::collect_candidates(&page.body);
    debug!("{}: {} candidate URLs", page.url, candidates.len());

    let lines: Vec<&str> = page.body.lines().collect();
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for cand in candidates {
        if !filter::is_stream_url(cfg, &cand.url) {
            continue;
        }
        if !seen.insert(cand.url.clone()) {
            continue;
        }
        let label = label::infer_label(cfg, &lines, cand.line, &cand.url)
            .unwrap_or_else(|| format!("Channel {}", entries.len() + 1));
        entries.push(StreamEntry {
            media_type: MediaType::from_url(&cand.url),
            url: cand.url,
            label,
            discovered_at: page.fetched_at,
            source_line: cand.line,
        });
    }

    entries
}
