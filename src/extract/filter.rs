use crate::config::Config;

/// Two-tier substring heuristic: the exclude list rejects unconditionally,
/// the include list accepts, anything else is rejected. Case-insensitive.
/// False positives and negatives are expected; this is not a classifier.
pub fn is_stream_url(cfg: &Config, url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if cfg.exclude_markers.iter().any(|m| lower.contains(m.as_str())) {
        return false;
    }
    cfg.include_markers.iter().any(|m| lower.contains(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn accepts_media_extensions() {
        let cfg = cfg();
        assert!(is_stream_url(&cfg, "https://cdn.example/playlist720_p.m3u8"));
        assert!(is_stream_url(&cfg, "https://cdn.example/movie.mp4"));
        assert!(is_stream_url(&cfg, "https://cdn.example/manifest.mpd"));
    }

    #[test]
    fn accepts_iptv_and_port_markers() {
        let cfg = cfg();
        assert!(is_stream_url(
            &cfg,
            "http://xxip9.top:8080/get.php?username=a&password=b&type=m3u_plus"
        ));
        assert!(is_stream_url(&cfg, "http://host.example:1935/app/ch"));
        assert!(is_stream_url(&cfg, "http://tv.example/player.php?id=tvb"));
    }

    #[test]
    fn rejects_unmatched_urls() {
        let cfg = cfg();
        assert!(!is_stream_url(&cfg, "https://example.com/about"));
        assert!(!is_stream_url(&cfg, "https://example.com/logs.html"));
    }

    #[test]
    fn rejects_static_assets() {
        let cfg = cfg();
        assert!(!is_stream_url(&cfg, "https://example.com/logo.png"));
        assert!(!is_stream_url(&cfg, "https://example.com/app.css"));
    }

    #[test]
    fn exclude_beats_include() {
        let cfg = cfg();
        // Include markers present, but the source site itself is blocked.
        assert!(!is_stream_url(&cfg, "https://streamtest.in/live/demo.m3u8"));
        // Static asset with a stream-looking path segment.
        assert!(!is_stream_url(&cfg, "https://cdn.example/live/poster.jpg"));
    }

    #[test]
    fn case_insensitive_matching() {
        let cfg = cfg();
        assert!(is_stream_url(&cfg, "https://cdn.example/LIVE/INDEX.M3U8"));
        assert!(!is_stream_url(&cfg, "https://cdn.example/LOGO.PNG"));
    }
}
