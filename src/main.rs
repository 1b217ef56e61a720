//! # Ao Daily News
//!
//! A once-per-invocation news collection pipeline: pulls entries from a
//! fixed set of Google News RSS feeds across three topic categories (AI,
//! minpaku, rental space), date-filters and deduplicates them, enriches
//! entries that arrived without a description by scraping the linked page,
//! summarizes each item through the Gemini API with a per-category persona
//! prompt, and writes a `news.json` latest file plus a dated archive
//! snapshot and capped archive index.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... ao_daily_news -d ./data
//! ```
//!
//! ## Architecture
//!
//! The pipeline is linear, one pass per category:
//! 1. **Fetch**: pull up to 5 entries from each of the category's 3 feeds
//! 2. **Filter**: drop entries older than the target JST date
//! 3. **Dedupe**: case-insensitive 50-character title-prefix keys
//! 4. **Enrich**: scrape the article page when the feed gave no description
//! 5. **Summarize**: Gemini prompt per category, canned fallback on failure
//! 6. **Persist**: latest slot, archive snapshot, archive index

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod feeds;
mod models;
mod outputs;
mod scrapers;
mod summarize;
mod utils;

use api::{GeminiClient, GenerateText};
use cli::Cli;
use models::{Category, DailyDigest, FeedEntry, NewsItem};
use outputs::{indexes, json};
use scrapers::{page, rss};
use summarize::detect_ai_tools;
use utils::{default_target_date, dedupe_by_title, ensure_writable_dir, filter_stale_entries};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ao_daily_news starting up");

    let args = Cli::parse();

    // Early check: ensure the data directory is writable
    if let Err(e) = ensure_writable_dir(&args.data_dir).await {
        error!(
            path = %args.data_dir,
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(concat!("ao_daily_news/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let model = match args.gemini_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => Some(GeminiClient::new(key.to_string())?),
        None => {
            warn!("GEMINI_API_KEY not set; running in fallback mode");
            None
        }
    };

    let target_date = args.date.unwrap_or_else(default_target_date);
    let mut digest = DailyDigest::new(target_date.to_string(), Local::now().to_rfc3339());
    info!(date = %digest.date, model = model.is_some(), "Digest initialized");

    for category in Category::ALL {
        let items = process_category(
            &http,
            model.as_ref(),
            category,
            target_date,
            args.max_articles,
        )
        .await;
        info!(%category, count = items.len(), "Processed category");
        *digest.items_mut(category) = items;
    }

    if digest.is_empty() {
        warn!("No items collected in any category; writing empty digest");
    }

    json::write_digest(&digest, &args.data_dir).await?;

    if let Err(e) = indexes::update_archive_index(&args.data_dir, &digest.date).await {
        error!(error = %e, "Failed to update archive index");
    }

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        items = digest.len(),
        "Execution complete"
    );

    Ok(())
}

/// Run the fetch → filter → dedupe → enrich → summarize pipeline for one
/// category and return its finished items.
#[instrument(level = "info", skip_all, fields(%category, %target_date))]
async fn process_category<G: GenerateText>(
    http: &reqwest::Client,
    model: Option<&G>,
    category: Category,
    target_date: chrono::NaiveDate,
    max_articles: usize,
) -> Vec<NewsItem> {
    use futures::stream::{self, StreamExt};
    let entries: Vec<FeedEntry> = stream::iter(feeds::feeds_for(category))
        .then(|feed| rss::fetch_entries(http, feed))
        .concat()
        .await;
    info!(collected = entries.len(), "Collected feed entries");

    let entries = filter_stale_entries(entries, target_date);
    let mut entries = dedupe_by_title(entries);
    entries.truncate(max_articles);

    let mut items = Vec::with_capacity(entries.len());
    for mut entry in entries {
        if entry.description.is_empty() {
            if let Some(snippet) = page::fetch_snippet(http, &entry.link).await {
                entry.description = snippet;
            }
        }

        let parts = summarize::summarize(model, category, &entry).await;

        let tools = (category == Category::Ai)
            .then(|| detect_ai_tools(&format!("{} {}", entry.title, entry.description)));

        items.push(NewsItem {
            title: entry.title,
            url: entry.link,
            source: entry.source,
            summary: parts.summary,
            detail: parts.detail,
            ao_comment: parts.ao_comment,
            tools,
        });
    }

    items
}
