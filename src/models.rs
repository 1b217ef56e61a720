//! Data models for feed entries, summarized news items, and the daily digest.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Category`]: the three fixed topic buckets
//! - [`FeedEntry`]: a raw syndication entry as pulled from an RSS feed
//! - [`SummaryParts`]: the summary/detail/comment triple produced by the model
//! - [`NewsItem`]: a fully processed item ready for serialization
//! - [`DailyDigest`]: the dated envelope written to disk
//!
//! `aoComment` keeps its camelCase spelling on the wire to match the JSON
//! schema the model is prompted with and the files consumed downstream.

use serde::{Deserialize, Serialize};

/// The three fixed topic buckets news is collected under.
///
/// The wire keys (`ai`, `minpaku`, `rental`) double as the per-category
/// field names in [`DailyDigest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// AI and generative-model news.
    Ai,
    /// Short-term-rental (民泊) regulation and market news.
    Minpaku,
    /// Shared/rental-space (レンタルスペース) news.
    Rental,
}

impl Category {
    /// All categories in processing and serialization order.
    pub const ALL: [Category; 3] = [Category::Ai, Category::Minpaku, Category::Rental];

    /// The category's wire key.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Ai => "ai",
            Category::Minpaku => "minpaku",
            Category::Rental => "rental",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A raw syndication entry as pulled from an RSS feed, before enrichment
/// and summarization.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    /// The entry headline.
    pub title: String,
    /// Canonical link to the article.
    pub link: String,
    /// The raw published timestamp string from the feed, if any.
    pub published: String,
    /// HTML-stripped description, capped at 500 characters.
    pub description: String,
    /// Human-readable name of the feed the entry came from.
    pub source: String,
}

/// The summary/detail/comment triple extracted from a model response.
///
/// `detail` and `aoComment` default to empty so a model response that
/// omits one still parses.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SummaryParts {
    /// Two-to-three sentence Japanese summary of the news.
    pub summary: String,
    /// Longer detail paragraph, possibly empty.
    #[serde(default)]
    pub detail: String,
    /// Persona-flavored comment from the site mascot's point of view.
    #[serde(rename = "aoComment", default)]
    pub ao_comment: String,
}

/// A fully processed news item ready for serialization.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsItem {
    /// The article headline.
    pub title: String,
    /// Canonical article URL.
    pub url: String,
    /// Name of the feed the item was collected from.
    pub source: String,
    /// Localized summary.
    pub summary: String,
    /// Detail paragraph, possibly empty.
    pub detail: String,
    /// Persona comment.
    #[serde(rename = "aoComment")]
    pub ao_comment: String,
    /// Detected AI tool tags; only present for the `ai` category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

/// The dated envelope one run produces.
///
/// Written verbatim to both the mutable `news.json` slot and the immutable
/// `archive/{date}.json` slot.
#[derive(Debug, Deserialize, Serialize)]
pub struct DailyDigest {
    /// Target JST calendar date in `YYYY-MM-DD` format.
    pub date: String,
    /// RFC 3339 timestamp of when this run produced the digest.
    pub generated_at: String,
    /// AI news items.
    pub ai: Vec<NewsItem>,
    /// Minpaku news items.
    pub minpaku: Vec<NewsItem>,
    /// Rental-space news items.
    pub rental: Vec<NewsItem>,
}

impl DailyDigest {
    /// Create an empty digest for the given date.
    pub fn new(date: String, generated_at: String) -> Self {
        Self {
            date,
            generated_at,
            ai: Vec::new(),
            minpaku: Vec::new(),
            rental: Vec::new(),
        }
    }

    /// Mutable access to one category's item list.
    pub fn items_mut(&mut self, category: Category) -> &mut Vec<NewsItem> {
        match category {
            Category::Ai => &mut self.ai,
            Category::Minpaku => &mut self.minpaku,
            Category::Rental => &mut self.rental,
        }
    }

    /// Total item count across all categories.
    pub fn len(&self) -> usize {
        self.ai.len() + self.minpaku.len() + self.rental.len()
    }

    /// True when no category collected any items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
