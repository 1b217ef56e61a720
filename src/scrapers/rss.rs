//! RSS feed polling via the `rss` crate.
//!
//! Google News search feeds are standard RSS 2.0. Each entry keeps its
//! title, link, raw published string, and the first 500 characters of the
//! HTML-stripped description.

use crate::feeds::Feed;
use crate::models::FeedEntry;
use crate::utils::{strip_html, truncate_chars};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Maximum entries taken from a single feed.
pub const MAX_ENTRIES_PER_FEED: usize = 5;

/// Fetch one feed and convert its entries.
///
/// Failures are logged and reported as an empty list so one dead feed
/// never sinks the category.
#[instrument(level = "info", skip_all, fields(feed = %feed.name))]
pub async fn fetch_entries(client: &reqwest::Client, feed: &Feed) -> Vec<FeedEntry> {
    match fetch_channel(client, feed).await {
        Ok(channel) => {
            let entries = parse_channel(&channel, feed.name, MAX_ENTRIES_PER_FEED);
            info!(count = entries.len(), "Fetched feed entries");
            entries
        }
        Err(e) => {
            warn!(error = %e, url = %feed.url(), "RSS fetch failed");
            Vec::new()
        }
    }
}

async fn fetch_channel(
    client: &reqwest::Client,
    feed: &Feed,
) -> Result<rss::Channel, Box<dyn Error>> {
    let url = feed.url();
    debug!(%url, "Fetching RSS feed");

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("feed returned status {status}").into());
    }

    let content = response.bytes().await?;
    let channel = rss::Channel::read_from(&content[..])?;
    Ok(channel)
}

/// Convert up to `max_entries` channel items into [`FeedEntry`] values.
///
/// Items without a title or link are skipped; descriptions are stripped of
/// HTML and capped at 500 characters.
pub fn parse_channel(channel: &rss::Channel, source: &str, max_entries: usize) -> Vec<FeedEntry> {
    channel
        .items()
        .iter()
        .take(max_entries)
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let link = item.link()?.to_string();
            let description = item
                .description()
                .map(|d| truncate_chars(&strip_html(d), 500))
                .unwrap_or_default();

            Some(FeedEntry {
                title,
                link,
                published: item.pub_date().unwrap_or_default().to_string(),
                description,
                source: source.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_from(items_xml: &str) -> rss::Channel {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0">
              <channel>
                <title>Google News</title>
                <link>https://news.google.com</link>
                <description>test</description>
                {items_xml}
              </channel>
            </rss>"#
        );
        rss::Channel::read_from(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_channel_basic_fields() {
        let channel = channel_from(
            r#"<item>
                 <title>民泊規制が強化へ</title>
                 <link>https://example.com/a</link>
                 <pubDate>Mon, 23 Jun 2025 14:30:00 GMT</pubDate>
                 <description>&lt;p&gt;概要の&lt;b&gt;本文&lt;/b&gt;です&lt;/p&gt;</description>
               </item>"#,
        );

        let entries = parse_channel(&channel, "Google News 民泊規制", 5);
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.title, "民泊規制が強化へ");
        assert_eq!(e.link, "https://example.com/a");
        assert_eq!(e.published, "Mon, 23 Jun 2025 14:30:00 GMT");
        assert_eq!(e.description, "概要の 本文 です");
        assert_eq!(e.source, "Google News 民泊規制");
    }

    #[test]
    fn test_parse_channel_caps_entries() {
        let items: String = (0..10)
            .map(|i| {
                format!(
                    "<item><title>story {i}</title><link>https://example.com/{i}</link></item>"
                )
            })
            .collect();
        let channel = channel_from(&items);

        let entries = parse_channel(&channel, "Test", MAX_ENTRIES_PER_FEED);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].title, "story 0");
    }

    #[test]
    fn test_parse_channel_skips_items_missing_link() {
        let channel = channel_from(
            r#"<item><title>no link here</title></item>
               <item><title>complete</title><link>https://example.com/b</link></item>"#,
        );

        let entries = parse_channel(&channel, "Test", 5);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "complete");
    }

    #[test]
    fn test_parse_channel_truncates_long_description() {
        let long = "x".repeat(800);
        let channel = channel_from(&format!(
            "<item><title>t</title><link>https://example.com/c</link><description>{long}</description></item>"
        ));

        let entries = parse_channel(&channel, "Test", 5);
        assert_eq!(entries[0].description.chars().count(), 500);
    }

    #[test]
    fn test_parse_channel_missing_optional_fields() {
        let channel =
            channel_from("<item><title>t</title><link>https://example.com/d</link></item>");
        let entries = parse_channel(&channel, "Test", 5);
        assert_eq!(entries[0].published, "");
        assert_eq!(entries[0].description, "");
    }
}
