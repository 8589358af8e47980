mod archive;
mod config;
mod extract;
mod fetch;
mod playlist;

use std::time::Instant;

use anyhow::bail;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cfg = Config::from_env();
    let client = fetch::build_client(&cfg)?;

    println!("Scanning {} pages from {}", cfg.page_count, cfg.base_url);

    let pb = ProgressBar::new(cfg.page_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")?
            .progress_chars("=> "),
    );

    let mut collected = Vec::new();
    let mut pages_ok = 0usize;
    let mut pages_failed = 0usize;

    for page_no in 1..=cfg.page_count {
        let url = cfg.page_url(page_no);
        match fetch::fetch_page(&client, &url).await {
            Ok(page) => {
                pages_ok += 1;
                if cfg.debug_dump {
                    if let Err(e) = fetch::dump_page(&cfg, page_no, &page.body) {
                        warn!("Debug dump for page {} failed: {:#}", page_no, e);
                    }
                }
                let entries = extract::process_page(&cfg, &page);
                if entries.is_empty() {
                    warn!("No stream links on page {} ({} bytes)", page_no, page.body.len());
                } else {
                    info!("Page {}: {} stream links", page_no, entries.len());
                }
                collected.extend(entries);
            }
            Err(e) => {
                pages_failed += 1;
                warn!("Page {} skipped: {:#}", page_no, e);
            }
        }
        pb.inc(1);
        if page_no < cfg.page_count {
            tokio::time::sleep(cfg.page_delay).await;
        }
    }
    pb.finish_and_clear();

    let entries = playlist::dedupe(collected);
    info!(
        "Fetched {}/{} pages ({} failed), {} unique stream links",
        pages_ok,
        cfg.page_count,
        pages_failed,
        entries.len()
    );

    if entries.is_empty() {
        bail!("no stream links discovered across {} pages", cfg.page_count);
    }

    for entry in entries.iter().take(5) {
        println!("  [{}] {}: {}", entry.media_type.as_str(), entry.label, entry.url);
    }
    if entries.len() > 5 {
        println!("  ... and {} more", entries.len() - 5);
    }

    let generated_at = Utc::now();
    let path = playlist::write(&cfg, &entries, generated_at)?;
    println!("Playlist written: {} ({} streams)", path.display(), entries.len());

    let archived = archive::update(&cfg, &entries)?;
    println!("Archive updated: {} unique streams total", archived);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}
