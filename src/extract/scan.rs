use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// URLs ending in a known media extension, query string allowed.
static MEDIA_EXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>]+?\.(?:m3u8|m3u|mpd|mp4|ts)[^\s"'<>]*"#).unwrap()
});

/// HLS playlists reached through a recognizable stream path segment.
static STREAM_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)https?://[^\s"'<>]+/(?:live|playlist|master|stream|index|hls)[^\s"'<>]*\.m3u8[^\s"'<>]*"#,
    )
    .unwrap()
});

/// Anything URL-shaped; the filter decides what survives.
static ANY_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).unwrap());

/// A URL-shaped substring found in page text, not yet validated as a stream.
#[derive(Debug, Clone)]
pub struct CandidateLink {
    pub url: String,
    /// Zero-based line index of the match in the source document.
    pub line: usize,
}

/// Whole-document scan: union of all pattern matches in document order,
/// cleaned and deduplicated first-seen-wins. A page with no matches yields
/// an empty vector.
pub fn collect_candidates(text: &str) -> Vec<CandidateLink> {
    let patterns: [&Regex; 3] = [&*MEDIA_EXT_RE, &*STREAM_PATH_RE, &*ANY_URL_RE];

    let mut matches: Vec<(usize, String)> = Vec::new();
    for re in patterns {
        for m in re.find_iter(text) {
            let url = clean_url(m.as_str());
            if !url.is_empty() {
                matches.push((m.start(), url));
            }
        }
    }
    // Stable sort: document position wins, pattern order breaks ties.
    matches.sort_by_key(|(start, _)| *start);

    let line_starts = line_start_offsets(text);
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for (start, url) in matches {
        if !seen.insert(url.clone()) {
            continue;
        }
        candidates.push(CandidateLink {
            url,
            line: line_at_offset(&line_starts, start),
        });
    }
    candidates
}

/// Cut pipe-delimited trailing text and surrounding whitespace.
fn clean_url(raw: &str) -> String {
    raw.split_whitespace()
        .next()
        .unwrap_or("")
        .split('|')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

fn line_start_offsets(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn line_at_offset(starts: &[usize], offset: usize) -> usize {
    starts.partition_point(|&s| s <= offset) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_urls_no_candidates() {
        assert!(collect_candidates("").is_empty());
        assert!(collect_candidates("plain text\nwith no links at all").is_empty());
    }

    #[test]
    fn finds_media_urls_in_markup() {
        let html = r#"<a href="https://example.com/live/stream.m3u8">Watch</a>"#;
        let cands = collect_candidates(html);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].url, "https://example.com/live/stream.m3u8");
    }

    #[test]
    fn union_keeps_document_order() {
        let text = "http://b.example/page\nhttps://a.example/x.m3u8?token=1";
        let cands = collect_candidates(text);
        let urls: Vec<&str> = cands.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["http://b.example/page", "https://a.example/x.m3u8?token=1"]
        );
    }

    #[test]
    fn duplicate_urls_collapse_to_first() {
        let text = "https://cdn.example/a.m3u8\nmore\nhttps://cdn.example/a.m3u8";
        let cands = collect_candidates(text);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].line, 0);
    }

    #[test]
    fn pipe_delimited_tail_is_cut() {
        let cands = collect_candidates("https://cdn.example/a.m3u8|720p");
        assert_eq!(cands[0].url, "https://cdn.example/a.m3u8");
    }

    #[test]
    fn line_indices_match_source() {
        let text = "first line\nsecond https://x.example/v.mp4 here\nthird";
        let cands = collect_candidates(text);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].line, 1);
    }

    #[test]
    fn query_string_preserved() {
        let text = r#"src='http://xxip9.top:8080/get.php?username=test&password=test&type=m3u_plus'"#;
        let cands = collect_candidates(text);
        assert_eq!(
            cands[0].url,
            "http://xxip9.top:8080/get.php?username=test&password=test&type=m3u_plus"
        );
    }
}
