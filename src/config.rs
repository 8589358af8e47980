use std::path::PathBuf;
use std::time::Duration;

const BASE_URL: &str = "https://streamtest.in/logs";
const PAGE_COUNT: usize = 5;
const PAGE_DELAY_MS: u64 = 1500;
const REQUEST_TIMEOUT_SECS: u64 = 20;
const OUTPUT_DIR: &str = "outputs";
const PLAYLIST_NAME: &str = "streams.m3u";
const ARCHIVE_NAME: &str = "stream_archive.json";
const DEBUG_DUMP_BYTES: usize = 64 * 1024;
const LABEL_MAX_LEN: usize = 100;
const CONTEXT_LINES: usize = 3;

/// Substrings that mark a URL as a likely stream. Checked after the
/// exclude list; a URL matching neither list is rejected.
const INCLUDE_MARKERS: &[&str] = &[
    ".m3u8", ".m3u", ".mpd", ".mp4", ".ts", // media files
    "get.php",                              // IPTV panels
    "/live/", "/stream/", "/hls/",          // stream paths
    ":8080/", ":1935/",                     // stream ports
    "id=tvb", "id=sz", "id=%",              // TV query params
];

/// Substrings that disqualify a URL outright: the source site's own pages,
/// static assets, analytics and social embeds.
const EXCLUDE_MARKERS: &[&str] = &[
    "streamtest.in",
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico",
    ".css", ".js", ".woff",
    "google-analytics", "googletagmanager", "doubleclick.net",
    "facebook.com", "twitter.com", "instagram.com", "t.me/",
];

/// Run configuration. Every component takes this by reference, so tests can
/// inject fixtures instead of hitting the live site.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub page_count: usize,
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub output_dir: PathBuf,
    pub playlist_name: String,
    pub timestamped_copy: bool,
    pub archive_name: String,
    pub debug_dump: bool,
    pub debug_dump_bytes: usize,
    pub include_markers: Vec<String>,
    pub exclude_markers: Vec<String>,
    pub label_max_len: usize,
    pub context_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            page_count: PAGE_COUNT,
            page_delay: Duration::from_millis(PAGE_DELAY_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            output_dir: PathBuf::from(OUTPUT_DIR),
            playlist_name: PLAYLIST_NAME.to_string(),
            timestamped_copy: true,
            archive_name: ARCHIVE_NAME.to_string(),
            debug_dump: false,
            debug_dump_bytes: DEBUG_DUMP_BYTES,
            include_markers: INCLUDE_MARKERS.iter().map(|s| s.to_string()).collect(),
            exclude_markers: EXCLUDE_MARKERS.iter().map(|s| s.to_string()).collect(),
            label_max_len: LABEL_MAX_LEN,
            context_lines: CONTEXT_LINES,
        }
    }
}

impl Config {
    /// Defaults with optional environment overrides. There are no CLI flags;
    /// these knobs exist for the scheduled-CI deployment.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(dir) = std::env::var("COLLECTOR_OUTPUT_DIR") {
            if !dir.is_empty() {
                cfg.output_dir = PathBuf::from(dir);
            }
        }
        if let Ok(pages) = std::env::var("COLLECTOR_PAGES") {
            if let Ok(n) = pages.parse::<usize>() {
                if n > 0 {
                    cfg.page_count = n;
                }
            }
        }
        if std::env::var("COLLECTOR_DEBUG_DUMP").is_ok() {
            cfg.debug_dump = true;
        }
        cfg
    }

    pub fn page_url(&self, page_no: usize) -> String {
        format!("{}/page/{}", self.base_url, page_no)
    }

    pub fn playlist_path(&self) -> PathBuf {
        self.output_dir.join(&self.playlist_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(&self.archive_name)
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.output_dir.join("debug")
    }
}

/// Test fixture: tiny config pointing at a temp directory.
#[cfg(test)]
pub fn test_config(dir: &std::path::Path) -> Config {
    Config {
        output_dir: dir.to_path_buf(),
        timestamped_copy: false,
        ..Config::default()
    }
}
