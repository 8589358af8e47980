use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Hls,
    Dash,
    Mp4,
    Unknown,
}

impl MediaType {
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.contains(".m3u8") {
            Self::Hls
        } else if lower.contains(".mpd") {
            Self::Dash
        } else if lower.contains(".mp4") {
            Self::Mp4
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hls => "hls",
            Self::Dash => "dash",
            Self::Mp4 => "mp4",
            Self::Unknown => "unknown",
        }
    }
}

/// An accepted stream link. Immutable once created; `url` is the unique key
/// within a playlist and in the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEntry {
    pub url: String,
    pub label: String,
    pub media_type: MediaType,
    pub discovered_at: DateTime<Utc>,
    pub source_line: usize,
}

/// Collapse by URL, first-seen-wins, preserving first-occurrence order.
pub fn dedupe(entries: Vec<StreamEntry>) -> Vec<StreamEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.url.clone()))
        .collect()
}

/// Serialize entries to M3U text. The `#EXTM3U` header is emitted even for
/// an empty list.
pub fn render(entries: &[StreamEntry], source: &str, generated_at: DateTime<Utc>) -> String {
    let mut out = String::from("#EXTM3U\n");
    out.push_str(&format!(
        "# Generated {} from {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        source
    ));
    out.push_str(&format!("# Total: {} streams\n\n", entries.len()));

    for entry in entries {
        out.push_str(&format!(
            "#EXTINF:-1 tvg-logo=\"\" group-title=\"{}\",{}\n",
            entry.media_type.as_str().to_ascii_uppercase(),
            sanitize_label(&entry.label)
        ));
        out.push_str(&entry.url);
        out.push_str("\n\n");
    }
    out
}

/// Write the playlist to the configured path, plus a timestamped copy when
/// enabled. Filesystem errors here fail the whole run.
pub fn write(cfg: &Config, entries: &[StreamEntry], generated_at: DateTime<Utc>) -> Result<PathBuf> {
    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("Failed to create {}", cfg.output_dir.display()))?;

    let text = render(entries, &cfg.base_url, generated_at);
    let path = cfg.playlist_path();
    std::fs::write(&path, &text)
        .with_context(|| format!("Failed to write playlist {}", path.display()))?;

    if cfg.timestamped_copy {
        let stem = cfg.playlist_name.trim_end_matches(".m3u");
        let copy = cfg
            .output_dir
            .join(format!("{}_{}.m3u", stem, generated_at.format("%Y%m%d_%H%M%S")));
        std::fs::write(&copy, &text)
            .with_context(|| format!("Failed to write playlist copy {}", copy.display()))?;
        info!("Timestamped copy: {}", copy.display());
    }

    Ok(path)
}

/// M3U entry titles must stay on one line; pipes collide with the site's
/// "| Detail" markers.
fn sanitize_label(label: &str) -> String {
    let cleaned = label
        .replace('|', "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        "Unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn entry(url: &str, label: &str) -> StreamEntry {
        StreamEntry {
            url: url.to_string(),
            label: label.to_string(),
            media_type: MediaType::from_url(url),
            discovered_at: Utc::now(),
            source_line: 0,
        }
    }

    #[test]
    fn media_type_from_url() {
        assert_eq!(MediaType::from_url("http://x/a.m3u8?t=1"), MediaType::Hls);
        assert_eq!(MediaType::from_url("http://x/a.MPD"), MediaType::Dash);
        assert_eq!(MediaType::from_url("http://x/a.mp4"), MediaType::Mp4);
        assert_eq!(MediaType::from_url("http://x:8080/get.php"), MediaType::Unknown);
    }

    #[test]
    fn dedupe_first_seen_wins() {
        let deduped = dedupe(vec![
            entry("http://a/1.m3u8", "First"),
            entry("http://b/2.m3u8", "Other"),
            entry("http://a/1.m3u8", "Second"),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].label, "First");
        assert_eq!(deduped[1].url, "http://b/2.m3u8");
    }

    #[test]
    fn dedupe_is_idempotent() {
        let once = dedupe(vec![
            entry("http://a/1.m3u8", "A"),
            entry("http://a/1.m3u8", "A again"),
            entry("http://b/2.mp4", "B"),
        ]);
        let urls: Vec<String> = once.iter().map(|e| e.url.clone()).collect();
        let twice = dedupe(once);
        let urls2: Vec<String> = twice.iter().map(|e| e.url.clone()).collect();
        assert_eq!(urls, urls2);
    }

    #[test]
    fn empty_playlist_still_has_header() {
        let text = render(&[], "https://streamtest.in/logs", Utc::now());
        assert!(text.starts_with("#EXTM3U\n"));
        assert!(text.contains("# Total: 0 streams"));
        assert!(!text.contains("#EXTINF"));
    }

    #[test]
    fn one_extinf_url_pair_per_entry() {
        let entries = vec![
            entry("http://a/1.m3u8", "Alpha"),
            entry("http://b/2.mp4", "Beta"),
        ];
        let text = render(&entries, "src", Utc::now());

        assert_eq!(text.lines().next(), Some("#EXTM3U"));
        assert_eq!(text.matches("#EXTINF:-1").count(), 2);
        let lines: Vec<&str> = text.lines().collect();
        let idx = lines
            .iter()
            .position(|l| l.starts_with("#EXTINF") && l.ends_with("Alpha"))
            .unwrap();
        assert_eq!(lines[idx], "#EXTINF:-1 tvg-logo=\"\" group-title=\"HLS\",Alpha");
        assert_eq!(lines[idx + 1], "http://a/1.m3u8");
    }

    #[test]
    fn labels_sanitized_in_output() {
        let entries = vec![entry("http://a/1.m3u8", "Name | odd   spacing")];
        let text = render(&entries, "src", Utc::now());
        assert!(text.contains(",Name - odd spacing\n"));

        let blank = vec![entry("http://a/1.m3u8", "   ")];
        let text = render(&blank, "src", Utc::now());
        assert!(text.contains(",Unnamed\n"));
    }

    #[test]
    fn write_creates_dir_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = test_config(dir.path());
        cfg.output_dir = dir.path().join("nested").join("out");
        cfg.timestamped_copy = true;

        let entries = vec![entry("http://a/1.m3u8", "Alpha")];
        let now = Utc::now();
        let path = write(&cfg, &entries, now).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("#EXTM3U"));

        let copies: Vec<_> = std::fs::read_dir(&cfg.output_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("streams_"))
            .collect();
        assert_eq!(copies.len(), 1);
    }
}
