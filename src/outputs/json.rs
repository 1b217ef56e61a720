//! JSON persistence for the daily digest.
//!
//! Each run writes the same document twice: to the mutable `news.json`
//! slot, overwritten unconditionally, and to the immutable per-date
//! `archive/{date}.json` slot.

use crate::models::DailyDigest;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Write the digest to `{data_dir}/news.json` and
/// `{data_dir}/archive/{date}.json`, creating directories as needed.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir, date = %digest.date))]
pub async fn write_digest(digest: &DailyDigest, data_dir: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    let archive_dir = format!("{}/archive", data_dir.trim_end_matches('/'));
    fs::create_dir_all(&archive_dir).await?;

    let latest_path = format!("{}/news.json", data_dir.trim_end_matches('/'));
    fs::write(&latest_path, &json).await?;
    info!(path = %latest_path, "Wrote latest digest");

    let archive_path = format!("{}/{}.json", archive_dir, digest.date);
    fs::write(&archive_path, &json).await?;
    info!(path = %archive_path, "Wrote archive snapshot");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_digest_creates_both_slots() {
        let dir = std::env::temp_dir().join(format!("ao_news_json_{}", std::process::id()));
        let data_dir = dir.to_str().unwrap().to_string();
        let _ = fs::remove_dir_all(&data_dir).await;

        let digest = DailyDigest::new("2026-08-23".to_string(), "now".to_string());
        write_digest(&digest, &data_dir).await.unwrap();

        let latest = fs::read_to_string(format!("{data_dir}/news.json"))
            .await
            .unwrap();
        let archived = fs::read_to_string(format!("{data_dir}/archive/2026-08-23.json"))
            .await
            .unwrap();
        assert_eq!(latest, archived);

        let parsed: DailyDigest = serde_json::from_str(&latest).unwrap();
        assert_eq!(parsed.date, "2026-08-23");

        let _ = fs::remove_dir_all(&data_dir).await;
    }

    #[tokio::test]
    async fn test_write_digest_overwrites_latest() {
        let dir = std::env::temp_dir().join(format!("ao_news_json_ow_{}", std::process::id()));
        let data_dir = dir.to_str().unwrap().to_string();
        let _ = fs::remove_dir_all(&data_dir).await;

        let first = DailyDigest::new("2026-08-22".to_string(), "t1".to_string());
        let second = DailyDigest::new("2026-08-23".to_string(), "t2".to_string());
        write_digest(&first, &data_dir).await.unwrap();
        write_digest(&second, &data_dir).await.unwrap();

        let latest: DailyDigest = serde_json::from_str(
            &fs::read_to_string(format!("{data_dir}/news.json"))
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(latest.date, "2026-08-23");

        // Both archive snapshots remain
        assert!(fs::try_exists(format!("{data_dir}/archive/2026-08-22.json"))
            .await
            .unwrap());
        assert!(fs::try_exists(format!("{data_dir}/archive/2026-08-23.json"))
            .await
            .unwrap());

        let _ = fs::remove_dir_all(&data_dir).await;
    }
}
