use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::fs::File;
use tracing::debug;

use crate::{fs::operations::replace_file, utils::time::date_to_record_name};

use super::entities::{ActivityLog, TimeEntry};

pub const LOG_FILE_NAME: &str = "activity_logs.json";
/// Guards appends. The log itself is swapped by a rename, so it can't carry the lock.
pub const LOCK_FILE_NAME: &str = "activity_logs.json.lock";

/// Interface for abstracting storage of logged intervals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Appends `entry` to the entries of `domain` for `date`.
    async fn append(&self, date: NaiveDate, domain: String, entry: TimeEntry) -> Result<()>;

    /// Retrieves the whole log.
    async fn read_all(&self) -> Result<ActivityLog>;
}

/// The main realization of [LogStore]. Every append rewrites the document while holding an
/// exclusive lock on [LOCK_FILE_NAME], and replaces the log atomically. Readers never see a
/// partial document, so the cli can read it while the host is running.
pub struct JsonLogStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonLogStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join(LOG_FILE_NAME),
            lock_path: dir.join(LOCK_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, contents: &[u8]) -> Result<ActivityLog> {
        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(ActivityLog::new());
        }
        serde_json::from_slice(contents)
            .with_context(|| format!("Activity log {:?} is corrupted", self.path))
    }

    async fn read_log(&self) -> Result<ActivityLog> {
        match tokio::fs::read(&self.path).await {
            Ok(contents) => self.parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ActivityLog::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn append_locked(&self, date: NaiveDate, domain: String, entry: TimeEntry) -> Result<()> {
        let mut log = self.read_log().await?;

        log.entry(date_to_record_name(date))
            .or_default()
            .entry(domain)
            .or_default()
            .push(entry);

        replace_file(&self.path, serde_json::to_vec(&log)?).await?;
        Ok(())
    }
}

#[async_trait]
impl LogStore for JsonLogStore {
    async fn append(&self, date: NaiveDate, domain: String, entry: TimeEntry) -> Result<()> {
        let lock = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .await?;

        // Semi-safe acquire-release for a file
        lock.lock_exclusive()?;
        let result = self.append_locked(date, domain, entry).await;
        lock.unlock_async().await?;
        result
    }

    async fn read_all(&self) -> Result<ActivityLog> {
        debug!("Reading {:?}", self.path);
        self.read_log().await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::host::storage::{
        entities::TimeEntry,
        log_store::{JsonLogStore, LogStore, LOCK_FILE_NAME, LOG_FILE_NAME},
    };

    fn test_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 7, 4, 10, 0, 0).unwrap()
    }

    fn entry(url: &str, offset: i64, seconds: i64) -> TimeEntry {
        let start = test_start() + Duration::seconds(offset);
        TimeEntry {
            url: url.into(),
            time_spent: seconds as u64,
            start_time: start,
            end_time: start + Duration::seconds(seconds),
        }
    }

    fn test_date() -> NaiveDate {
        test_start().date_naive()
    }

    #[tokio::test]
    async fn test_missing_log_reads_empty() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;

        assert!(storage.read_all().await?.is_empty());
        assert!(!storage.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_append_groups_by_date_and_domain() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;

        let entries = [
            entry("https://a.com/x", 0, 10),
            entry("https://b.com/y", 10, 4),
            entry("https://a.com/z", 14, 6),
        ];
        storage
            .append(test_date(), "a.com".into(), entries[0].clone())
            .await?;
        storage
            .append(test_date(), "b.com".into(), entries[1].clone())
            .await?;
        storage
            .append(test_date(), "a.com".into(), entries[2].clone())
            .await?;

        let log = storage.read_all().await?;

        assert_eq!(log.len(), 1);
        let day = &log["2018-07-04"];
        assert_eq!(day.len(), 2);
        assert_eq!(day["a.com"], vec![entries[0].clone(), entries[2].clone()]);
        assert_eq!(day["b.com"], vec![entries[1].clone()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_keeps_previous_days() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;

        let next_day = test_date().succ_opt().unwrap();
        storage
            .append(test_date(), "a.com".into(), entry("https://a.com/", 0, 1))
            .await?;
        storage
            .append(next_day, "a.com".into(), entry("https://a.com/", 86_400, 2))
            .await?;

        // A second store over the same directory sees everything the first one wrote.
        let reopened = JsonLogStore::new(dir.path().to_owned())?;
        let log = reopened.read_all().await?;

        assert_eq!(
            log.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["2018-07-04", "2018-07-05"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_file_layout() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;
        storage
            .append(test_date(), "a.com".into(), entry("https://a.com/x", 0, 10))
            .await?;

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(storage.path())?)?;

        assert_eq!(
            raw,
            serde_json::json!({
                "2018-07-04": {
                    "a.com": [{
                        "url": "https://a.com/x",
                        "timeSpent": 10,
                        "startTime": "2018-07-04T10:00:00.000Z",
                        "endTime": "2018-07-04T10:00:10.000Z",
                    }]
                }
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_log_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;
        std::fs::write(storage.path(), b"{\"2018-07-04\": {\"a.com\": [")?;

        let result = storage
            .append(test_date(), "a.com".into(), entry("https://a.com/x", 0, 10))
            .await;

        assert!(result.is_err());
        assert!(storage.read_all().await.is_err());
        assert_eq!(
            std::fs::read(storage.path())?,
            b"{\"2018-07-04\": {\"a.com\": ["
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_interrupted_write_keeps_log_readable() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;
        for offset in 0..3 {
            storage
                .append(
                    test_date(),
                    "z.com".into(),
                    entry("https://z.com/", offset * 10, 9),
                )
                .await?;
        }
        let before = std::fs::read(storage.path())?;

        // The host died while staging the next document.
        let mut next = storage.read_all().await?;
        next.entry("2018-07-04".into())
            .or_default()
            .entry("b.com".into())
            .or_default()
            .push(entry("https://b.com/", 30, 9));
        let next = serde_json::to_vec(&next)?;
        std::fs::write(
            dir.path().join(".activity_logs.json.x1y2z3.tmp"),
            &next[..next.len() * 2 / 5],
        )?;

        assert_eq!(std::fs::read(storage.path())?, before);
        let log = storage.read_all().await?;
        assert_eq!(log["2018-07-04"].len(), 1);
        assert_eq!(log["2018-07-04"]["z.com"].len(), 3);

        storage
            .append(test_date(), "b.com".into(), entry("https://b.com/", 30, 9))
            .await?;
        let log = storage.read_all().await?;
        assert_eq!(log["2018-07-04"]["z.com"].len(), 3);
        assert_eq!(log["2018-07-04"]["b.com"], vec![entry("https://b.com/", 30, 9)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_leaves_only_log_and_lock() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;
        storage
            .append(test_date(), "a.com".into(), entry("https://a.com/x", 0, 10))
            .await?;
        storage
            .append(test_date(), "a.com".into(), entry("https://a.com/x", 10, 10))
            .await?;

        let mut names = std::fs::read_dir(dir.path())?
            .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>>>()?;
        names.sort();

        assert_eq!(names, vec![LOG_FILE_NAME, LOCK_FILE_NAME]);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_file_reads_empty() -> Result<()> {
        let dir = tempdir()?;
        let storage = JsonLogStore::new(dir.path().to_owned())?;
        std::fs::write(storage.path(), b"\n")?;

        assert!(storage.read_all().await?.is_empty());

        storage
            .append(test_date(), "a.com".into(), entry("https://a.com/x", 0, 10))
            .await?;
        assert_eq!(storage.read_all().await?["2018-07-04"]["a.com"].len(), 1);
        Ok(())
    }
}
