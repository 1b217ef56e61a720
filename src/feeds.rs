//! The fixed RSS feed table, three Google News search feeds per category.
//!
//! Every feed is a Google News RSS search endpoint. The query is kept as
//! plain text here and percent-encoded when the URL is built; each category
//! mixes Japanese-locale feeds with one global English feed.

use crate::models::Category;

const GOOGLE_NEWS_RSS: &str = "https://news.google.com/rss/search";

/// Japanese-locale feed parameters.
const LOCALE_JP: &str = "hl=ja&gl=JP&ceid=JP:ja";
/// US English feed parameters.
const LOCALE_US: &str = "hl=en&gl=US&ceid=US:en";

/// One RSS search feed and the source name its entries are attributed to.
#[derive(Debug, Clone, Copy)]
pub struct Feed {
    /// Search query, unencoded.
    pub query: &'static str,
    /// Locale query-string suffix.
    pub locale: &'static str,
    /// Source name recorded on every item pulled from this feed.
    pub name: &'static str,
}

impl Feed {
    /// The full feed URL with the query percent-encoded.
    pub fn url(&self) -> String {
        format!(
            "{}?q={}&{}",
            GOOGLE_NEWS_RSS,
            urlencoding::encode(self.query),
            self.locale
        )
    }
}

const AI_FEEDS: [Feed; 3] = [
    Feed {
        query: "AI ChatGPT Claude Gemini",
        locale: LOCALE_JP,
        name: "Google News AI",
    },
    Feed {
        query: "生成AI 人工知能",
        locale: LOCALE_JP,
        name: "Google News 生成AI",
    },
    Feed {
        query: "OpenAI Anthropic Google AI",
        locale: LOCALE_US,
        name: "Google News AI (Global)",
    },
];

const MINPAKU_FEEDS: [Feed; 3] = [
    Feed {
        query: "民泊 規制",
        locale: LOCALE_JP,
        name: "Google News 民泊規制",
    },
    Feed {
        query: "民泊 Airbnb",
        locale: LOCALE_JP,
        name: "Google News 民泊",
    },
    Feed {
        query: "vacation rental regulation",
        locale: LOCALE_US,
        name: "Global Vacation Rental",
    },
];

const RENTAL_FEEDS: [Feed; 3] = [
    Feed {
        query: "レンタルスペース シェアスペース",
        locale: LOCALE_JP,
        name: "Google News レンタルスペース",
    },
    Feed {
        query: "インスタベース スペースマーケット",
        locale: LOCALE_JP,
        name: "Google News スペースプラットフォーム",
    },
    Feed {
        query: "coworking space sharing",
        locale: LOCALE_US,
        name: "Global Space Sharing",
    },
];

/// The feeds polled for a category.
pub fn feeds_for(category: Category) -> &'static [Feed] {
    match category {
        Category::Ai => &AI_FEEDS,
        Category::Minpaku => &MINPAKU_FEEDS,
        Category::Rental => &RENTAL_FEEDS,
    }
}
