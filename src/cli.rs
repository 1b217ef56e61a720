//! Command-line interface definitions for Ao Daily News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The Gemini key can be provided via flag or environment variable.

use chrono::NaiveDate;
use clap::Parser;

/// Command-line arguments for the Ao Daily News collector.
///
/// # Examples
///
/// ```sh
/// # Default run: yesterday's news (JST) into ./data
/// ao_daily_news
///
/// # Rebuild a specific date into another directory
/// ao_daily_news -d /srv/news/data --date 2026-08-20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory that receives news.json and the archive
    #[arg(short, long, default_value = "./data")]
    pub data_dir: String,

    /// Maximum articles kept per category
    #[arg(long, default_value_t = 5)]
    pub max_articles: usize,

    /// Target date override (YYYY-MM-DD, JST calendar); defaults to yesterday in JST
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Gemini API key; summaries fall back to canned text when absent
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
}
