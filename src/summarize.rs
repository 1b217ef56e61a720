//! Prompt construction, model-response JSON extraction, and the fallback
//! path used when the model is unavailable.
//!
//! Each category gets its own Japanese prompt: AI news is summarized for
//! beginners with a business-idea comment, minpaku and rental-space news
//! are summarized from the owner's point of view. The model is asked for a
//! JSON object, but responses routinely arrive wrapped in prose or code
//! fences, so the first `{ ... }` span is cut out with a regex before
//! parsing.

use crate::api::GenerateText;
use crate::models::{Category, FeedEntry, SummaryParts};
use crate::utils::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument, warn};

/// Greedy first-`{`-to-last-`}` span. The model's object is the outermost
/// one, so greedy matching keeps nested braces intact.
static JSON_OBJECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

/// AI tool keyword table for the `ai` category's tags. Order here is the
/// order tags are emitted in.
const AI_TOOLS: [(&str, &[&str]); 5] = [
    (
        "ChatGPT",
        &["chatgpt", "chat gpt", "openai", "gpt-4", "gpt-5", "gpt4", "gpt5"],
    ),
    ("Claude", &["claude", "anthropic"]),
    ("Gemini", &["gemini", "google ai", "bard"]),
    ("Manus", &["manus"]),
    ("Genspark", &["genspark"]),
];

/// Build the category-specific prompt for one entry.
pub fn build_prompt(category: Category, entry: &FeedEntry) -> String {
    let header = match category {
        Category::Ai => "以下のAI関連ニュースについて、日本語で要約とコメントを作成してください。",
        Category::Minpaku => {
            "以下の民泊関連ニュースについて、民泊オーナーの立場で要約とコメントを作成してください。"
        }
        Category::Rental => {
            "以下のレンタルスペース関連ニュースについて、スペースオーナーの立場で要約とコメントを作成してください。"
        }
    };

    let (summary_hint, detail_hint, comment_hint) = match category {
        Category::Ai => (
            "ニュースの要点を2-3文で初心者にもわかりやすく説明",
            "もう少し詳しい解説（あれば）",
            "このAI技術を民泊やレンタルスペースビジネスに活用するとしたら、どんなことができるか？という視点でのアイデアや発想のヒントを1-2文で",
        ),
        Category::Minpaku => (
            "ニュースの要点を2-3文で説明",
            "オーナーが知っておくべき詳細情報（あれば）",
            "民泊オーナーとして、このニュースをどう活かすか、どう対応すべきかのアドバイスを1-2文で",
        ),
        Category::Rental => (
            "ニュースの要点を2-3文で説明",
            "オーナーが知っておくべき詳細情報（あれば）",
            "レンタルスペースオーナーとして、このニュースをどう活かすか、新しいスペースジャンルのアイデアなどを1-2文で",
        ),
    };

    format!(
        "{header}\n\n\
         タイトル: {title}\n\
         概要: {summary}\n\n\
         出力形式（JSON）:\n\
         {{\n\
             \"summary\": \"{summary_hint}\",\n\
             \"detail\": \"{detail_hint}\",\n\
             \"aoComment\": \"{comment_hint}\"\n\
         }}\n\n\
         JSONのみを出力してください。\n",
        title = entry.title,
        summary = entry.description,
    )
}

/// Extract the first JSON object from free-form model output and parse it.
///
/// Returns `None` when no `{ ... }` span exists or the span doesn't parse
/// as [`SummaryParts`].
pub fn extract_summary_json(text: &str) -> Option<SummaryParts> {
    let matched = JSON_OBJECT_RE.find(text)?;
    match serde_json::from_str::<SummaryParts>(matched.as_str()) {
        Ok(parts) => Some(parts),
        Err(e) => {
            debug!(error = %e, "Model JSON span did not parse");
            None
        }
    }
}

/// The canned summary used when the model cannot be reached or returns
/// unusable output: the entry's own description (title if empty) plus a
/// fixed per-category comment.
pub fn fallback_summary(category: Category, entry: &FeedEntry) -> SummaryParts {
    let summary = if entry.description.is_empty() {
        entry.title.clone()
    } else {
        truncate_chars(&entry.description, 200)
    };

    let ao_comment = match category {
        Category::Ai => {
            "このニュースの続報に注目です。AIの進化は民泊・レンタルスペース業界にも新しい可能性をもたらすかもしれません。"
        }
        Category::Minpaku => {
            "民泊オーナーとして、規制動向や市場トレンドは常にチェックしておきましょう。"
        }
        Category::Rental => {
            "インスタベースやスペースマーケットの新機能はこまめにチェック。新しいスペースジャンルにもアンテナを張りましょう。"
        }
    };

    SummaryParts {
        summary,
        detail: String::new(),
        ao_comment: ao_comment.to_string(),
    }
}

/// Summarize one entry, falling back to canned text when the model is
/// absent, the call fails, or the response has no parsable JSON object.
#[instrument(level = "info", skip_all, fields(%category, title = %entry.title))]
pub async fn summarize<G: GenerateText>(
    model: Option<&G>,
    category: Category,
    entry: &FeedEntry,
) -> SummaryParts {
    let Some(model) = model else {
        debug!("No API key configured; using fallback summary");
        return fallback_summary(category, entry);
    };

    let prompt = build_prompt(category, entry);
    match model.generate(&prompt).await {
        Ok(response) => extract_summary_json(&response).unwrap_or_else(|| {
            warn!("Model response had no parsable JSON object; using fallback summary");
            fallback_summary(category, entry)
        }),
        Err(e) => {
            warn!(error = %e, "Model call failed; using fallback summary");
            fallback_summary(category, entry)
        }
    }
}

/// Detect AI tool tags in free text. Matching is case-insensitive on the
/// keyword table, and tags come out in table order; `["Other"]` when
/// nothing matches.
pub fn detect_ai_tools(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let detected: Vec<String> = AI_TOOLS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(tool, _)| tool.to_string())
        .collect();

    if detected.is_empty() {
        vec!["Other".to_string()]
    } else {
        detected
    }
}
