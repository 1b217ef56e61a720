//! Archive index management.
//!
//! `archive/index.json` is a flat JSON array of date strings, newest first,
//! capped at the 100 most recent, with no duplicates. A missing or corrupt
//! index is treated as empty rather than failing the run.

use itertools::Itertools;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Maximum number of archive dates retained in the index.
pub const MAX_INDEX_ENTRIES: usize = 100;

/// Insert `date` at the front of the index unless already present, dedupe,
/// and cap at [`MAX_INDEX_ENTRIES`].
pub fn insert_date(index: Vec<String>, date: &str) -> Vec<String> {
    let mut updated = index;
    if !updated.iter().any(|d| d == date) {
        updated.insert(0, date.to_string());
    }

    // Dedupe defensively in case the file was hand-edited
    let mut updated: Vec<String> = updated.into_iter().unique().collect();
    updated.truncate(MAX_INDEX_ENTRIES);
    updated
}

/// Load `archive/index.json`, add `date`, and write the index back.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir, %date))]
pub async fn update_archive_index(data_dir: &str, date: &str) -> Result<(), Box<dyn Error>> {
    let index_path = format!("{}/archive/index.json", data_dir.trim_end_matches('/'));

    let index: Vec<String> = if Path::new(&index_path).exists() {
        match fs::read_to_string(&index_path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %index_path, error = %e, "Corrupt archive index; starting fresh");
                Vec::new()
            }),
            Err(e) => {
                warn!(path = %index_path, error = %e, "Unreadable archive index; starting fresh");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let updated = insert_date(index, date);
    fs::write(&index_path, serde_json::to_string_pretty(&updated)?).await?;
    info!(path = %index_path, entries = updated.len(), "Updated archive index");
    Ok(())
}
