use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d{1,2}:\d{2}\s*(?:AM|PM)?").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}").unwrap());
static AGO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s*(?:second|seconds|minute|minutes|hour|hours)\s+ago").unwrap()
});
static DETAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\|\s*Detail$").unwrap());
static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[<>"'|]"#).unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://([^/\s]+)").unwrap());

/// Infer a channel label for a URL found at `line` in the document.
/// Tries nearby text above the match, then the URL's host name. `None`
/// means the caller should fall back to a numbered placeholder.
pub fn infer_label(cfg: &Config, lines: &[&str], line: usize, url: &str) -> Option<String> {
    context_label(cfg, lines, line).or_else(|| host_label(url))
}

/// The listing puts the channel name on one of the few lines above the
/// tested URL, mixed with timestamps and a trailing "| Detail" marker.
fn context_label(cfg: &Config, lines: &[&str], line: usize) -> Option<String> {
    let start = line.saturating_sub(cfg.context_lines);
    for candidate in &lines[start..line.min(lines.len())] {
        let trimmed = candidate.trim();
        if trimmed.is_empty()
            || trimmed.len() >= cfg.label_max_len
            || trimmed.contains("http://")
            || trimmed.contains("https://")
        {
            continue;
        }
        let cleaned = clean_context(trimmed);
        if cleaned.len() > 2 {
            return Some(cleaned);
        }
    }
    None
}

fn clean_context(text: &str) -> String {
    let s = DETAIL_RE.replace_all(text, "");
    let s = CLOCK_RE.replace_all(&s, "");
    let s = DATE_RE.replace_all(&s, "");
    let s = AGO_RE.replace_all(&s, "");
    let s = STRIP_RE.replace_all(&s, "");
    let s = WS_RE.replace_all(&s, " ");
    s.trim().to_string()
}

/// Derive a label from the host: strip "www.", take the first DNS label
/// (dropping any port), capitalize.
fn host_label(url: &str) -> Option<String> {
    let host = HOST_RE.captures(url)?.get(1)?.as_str();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let first = host.split(['.', ':']).next()?;
    if first.is_empty() {
        return None;
    }
    let mut chars = first.chars();
    let head = chars.next()?;
    Some(head.to_uppercase().collect::<String>() + chars.as_str())
}
