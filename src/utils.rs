//! Utility functions for HTML cleanup, date handling, deduplication, and
//! file system checks.
//!
//! This module provides the text and time helpers used throughout the
//! pipeline:
//! - Best-effort HTML stripping for feed descriptions
//! - Character-safe truncation (titles and descriptions are mostly Japanese)
//! - Feed timestamp parsing and JST calendar-date mapping
//! - Title-prefix deduplication keys

use crate::models::FeedEntry;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use chrono_tz::Asia::Tokyo;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{debug, info, instrument};

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strip HTML down to readable text.
///
/// Removes `<script>` and `<style>` blocks with their contents, drops all
/// remaining tags, decodes the handful of entities Google News descriptions
/// actually contain, and collapses runs of whitespace to single spaces.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
/// ```
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");

    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a string to at most `max` characters.
///
/// Operates on `char` boundaries, not bytes; slicing Japanese text by byte
/// offset would panic mid-codepoint.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Deduplication key for a title: the first 50 characters, lowercased.
///
/// Google News often carries the same story from several outlets with
/// identical headlines that differ only in a trailing ` - Source` suffix,
/// which the prefix cut discards.
pub fn title_key(title: &str) -> String {
    title.to_lowercase().chars().take(50).collect()
}

/// Drop entries whose title key was already seen. First occurrence wins;
/// order is otherwise preserved.
pub fn dedupe_by_title(entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
    entries
        .into_iter()
        .unique_by(|e| title_key(&e.title))
        .collect()
}

/// Parse a feed timestamp string.
///
/// RSS feeds use RFC 2822 (`Mon, 23 Jun 2025 23:30:00 GMT`); some sources
/// emit RFC 3339 instead. Anything else is treated as unparsable.
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
}

/// Map a timestamp to its Asia/Tokyo calendar date.
pub fn jst_date(dt: DateTime<FixedOffset>) -> NaiveDate {
    dt.with_timezone(&Tokyo).date_naive()
}

/// The JST calendar date of an entry's published timestamp, if parsable.
pub fn published_jst_date(entry: &FeedEntry) -> Option<NaiveDate> {
    parse_published(&entry.published).map(jst_date)
}

/// Drop entries published before `target` (in JST). Entries with a missing
/// or unparsable timestamp are kept, best effort.
pub fn filter_stale_entries(entries: Vec<FeedEntry>, target: NaiveDate) -> Vec<FeedEntry> {
    let before = entries.len();
    let kept: Vec<FeedEntry> = entries
        .into_iter()
        .filter(|e| published_jst_date(e).map_or(true, |d| d >= target))
        .collect();
    debug!(before, after = kept.len(), %target, "Filtered stale entries");
    kept
}

/// The default target date: yesterday on the JST calendar. A run collects
/// the previous day's news regardless of where the machine is located.
pub fn default_target_date() -> NaiveDate {
    (Utc::now().with_timezone(&Tokyo) - Duration::days(1)).date_naive()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Data directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, published: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: "https://example.com/a".to_string(),
            published: published.to_string(),
            description: String::new(),
            source: "Test Feed".to_string(),
        }
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html("<p>Hello <b>world</b>!</p>"), "Hello world !");
    }

    #[test]
    fn test_strip_html_removes_script_and_style_contents() {
        let html = "<p>ok</p><script>var x = 1;</script><style>p { color: red }</style><p>end</p>";
        let text = strip_html(html);
        assert_eq!(text, "ok end");
        assert!(!text.contains("var x"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_strip_html_multiline_script() {
        let html = "before<script type=\"text/javascript\">\nline1();\nline2();\n</script>after";
        assert_eq!(strip_html(html), "before after");
    }

    #[test]
    fn test_strip_html_entities_and_whitespace() {
        let html = "A&nbsp;&amp;&nbsp;B   \n\t C &quot;q&quot; &#39;s&#39; &lt;tag&gt;";
        assert_eq!(strip_html(html), "A & B C \"q\" 's' <tag>");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let s = "生成AIのニュースです";
        assert_eq!(truncate_chars(s, 4), "生成AI");
        assert_eq!(truncate_chars(s, 100), s);
    }

    #[test]
    fn test_title_key_case_insensitive_prefix() {
        let long = format!("{}{}", "A".repeat(50), "different tail");
        let other = format!("{}{}", "a".repeat(50), "OTHER TAIL");
        assert_eq!(title_key(&long), title_key(&other));
        assert_eq!(title_key("短いタイトル"), "短いタイトル");
    }

    #[test]
    fn test_dedupe_by_title_keeps_first() {
        let entries = vec![
            entry("OpenAI Releases New Model", ""),
            entry("OPENAI RELEASES NEW MODEL", ""),
            entry("Unrelated Story", ""),
        ];
        let deduped = dedupe_by_title(entries);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "OpenAI Releases New Model");
        assert_eq!(deduped[1].title, "Unrelated Story");
    }

    #[test]
    fn test_dedupe_by_title_prefix_only() {
        let a = format!("{} from Reuters", "x".repeat(50));
        let b = format!("{} from AP", "x".repeat(50));
        let deduped = dedupe_by_title(vec![entry(&a, ""), entry(&b, "")]);
        assert_eq!(deduped.len(), 1);
    }

    #[test]
    fn test_parse_published_rfc2822() {
        let dt = parse_published("Mon, 23 Jun 2025 14:30:00 GMT").unwrap();
        assert_eq!(jst_date(dt), NaiveDate::from_ymd_opt(2025, 6, 23).unwrap());
    }

    #[test]
    fn test_parse_published_rfc3339() {
        let dt = parse_published("2025-06-23T14:30:00+00:00").unwrap();
        assert_eq!(jst_date(dt), NaiveDate::from_ymd_opt(2025, 6, 23).unwrap());
    }

    #[test]
    fn test_parse_published_garbage() {
        assert!(parse_published("yesterday-ish").is_none());
        assert!(parse_published("").is_none());
    }

    #[test]
    fn test_jst_date_crosses_midnight() {
        // 23:30 UTC is 08:30 the next day in JST
        let dt = parse_published("Mon, 23 Jun 2025 23:30:00 GMT").unwrap();
        assert_eq!(jst_date(dt), NaiveDate::from_ymd_opt(2025, 6, 24).unwrap());
    }

    #[test]
    fn test_filter_stale_entries() {
        let target = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let entries = vec![
            // 23:30 UTC on the 23rd is already the 24th in JST: kept
            entry("fresh", "Mon, 23 Jun 2025 23:30:00 GMT"),
            // noon UTC on the 23rd is still the 23rd in JST: dropped
            entry("stale", "Mon, 23 Jun 2025 12:00:00 GMT"),
            // unparsable date: kept
            entry("undated", ""),
        ];
        let kept = filter_stale_entries(entries, target);
        let titles: Vec<&str> = kept.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["fresh", "undated"]);
    }
}
