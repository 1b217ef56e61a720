//! Article-page snippet extraction.
//!
//! When a feed entry arrives with an empty description, the linked page is
//! fetched once and mined for a short text snippet: `og:description` first,
//! then the plain `<meta name="description">`, then the first paragraph
//! with enough text to be body copy rather than boilerplate. Any failure
//! along the way leaves the snippet empty.

use crate::utils::truncate_chars;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

/// Paragraphs shorter than this are assumed to be navigation or bylines.
const MIN_PARAGRAPH_CHARS: usize = 40;

/// Snippets are capped to the same length as feed descriptions.
const MAX_SNIPPET_CHARS: usize = 500;

/// Fetch the article page and extract a description snippet, best effort.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_snippet(client: &reqwest::Client, url: &str) -> Option<String> {
    let html = match fetch_html(client, url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Article page fetch failed");
            return None;
        }
    };

    let snippet = extract_snippet(&html);
    match &snippet {
        Some(s) => debug!(chars = s.chars().count(), "Extracted page snippet"),
        None => debug!("Article page yielded no snippet"),
    }
    snippet
}

async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("page returned status {status}").into());
    }
    Ok(response.text().await?)
}

/// Pull a snippet out of raw HTML: meta descriptions first, then the first
/// substantial paragraph.
pub fn extract_snippet(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let og_selector = Selector::parse(r#"meta[property="og:description"]"#).unwrap();
    let meta_selector = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let p_selector = Selector::parse("p").unwrap();

    let meta_content = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty())
    };

    let snippet = meta_content(&og_selector)
        .or_else(|| meta_content(&meta_selector))
        .or_else(|| {
            document
                .select(&p_selector)
                .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
                .find(|text| text.chars().count() >= MIN_PARAGRAPH_CHARS)
        })?;

    Some(truncate_chars(&snippet, MAX_SNIPPET_CHARS))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
