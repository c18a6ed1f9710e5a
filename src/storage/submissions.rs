//! Submission persistence
//!
//! One pretty-printed JSON file per record, optionally partitioned by
//! year and month, plus a shared append-only JSONL log for leads.
//! Files are overwritten when identifiers collide (last write wins).

use chrono::{DateTime, Datelike, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::StorageError;
use super::record::SubmissionRecord;

/// Name of the shared lead log inside the store's base directory
pub const LEAD_LOG_FILE: &str = "leads-log.jsonl";

/// Where a record lands relative to the store's base directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionLayout {
    /// `<base>/<year>/<MM>/<id>.json`
    Partitioned,
    /// `<base>/<id>.json`
    Flat,
}

/// Writes submission records below a base directory
#[derive(Debug, Clone)]
pub struct SubmissionStore {
    base: PathBuf,
}

impl SubmissionStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn log_path(&self) -> PathBuf {
        self.base.join(LEAD_LOG_FILE)
    }

    /// Compute the file path for a record identifier
    pub fn path_for(&self, id: &str, layout: SubmissionLayout, received_at: DateTime<Utc>) -> PathBuf {
        let file_name = format!("{id}.json");
        match layout {
            SubmissionLayout::Flat => self.base.join(file_name),
            SubmissionLayout::Partitioned => self
                .base
                .join(received_at.year().to_string())
                .join(format!("{:02}", received_at.month()))
                .join(file_name),
        }
    }

    /// Write a validated record and return the path written
    ///
    /// Directory creation tolerates concurrent creators. A directory created
    /// here is left in place when the subsequent write fails.
    pub async fn persist(
        &self,
        record: &SubmissionRecord,
        layout: SubmissionLayout,
        received_at: DateTime<Utc>,
    ) -> Result<PathBuf, StorageError> {
        let id = record.id()?;
        let path = self.path_for(&id, layout, received_at);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StorageError::io("create directory", dir, e))?;
        }

        let json = record
            .to_pretty_json()
            .map_err(|e| StorageError::io("serialize", &path, e.into()))?;
        fs::write(&path, json)
            .await
            .map_err(|e| StorageError::io("write", &path, e))?;

        tracing::debug!(id = %id, path = %path.display(), "submission persisted");
        Ok(path)
    }

    /// Append one compact JSON line to the shared lead log
    ///
    /// The line is written with a single call on an append-mode handle.
    pub async fn append_log(&self, record: &SubmissionRecord) -> Result<(), StorageError> {
        let path = self.log_path();
        let line = record
            .to_log_line()
            .map_err(|e| StorageError::io("serialize", &path, e.into()))?;

        fs::create_dir_all(&self.base)
            .await
            .map_err(|e| StorageError::io("create directory", &self.base, e))?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::io("open", &path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StorageError::io("append to", &path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io("flush", &path, e))?;
        Ok(())
    }

    /// Path relative to `root`, with `/` separators, for client responses
    pub fn relative_to(path: &Path, root: &Path) -> String {
        let rel = path.strip_prefix(root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn at(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap()
    }

    fn booking(id: &str) -> SubmissionRecord {
        SubmissionRecord::from_value(json!({
            "id": id,
            "contact": {"name": "Asha", "phone": "9876543210"},
            "visitType": "online"
        }))
        .unwrap()
    }

    #[test]
    fn test_partitioned_path_pads_month() {
        let store = SubmissionStore::new("/data/leads");
        assert_eq!(
            store.path_for("BK1", SubmissionLayout::Partitioned, at(2026, 3)),
            PathBuf::from("/data/leads/2026/03/BK1.json")
        );
        assert_eq!(
            store.path_for("BK1", SubmissionLayout::Flat, at(2026, 3)),
            PathBuf::from("/data/leads/BK1.json")
        );
    }

    #[tokio::test]
    async fn test_persist_writes_pretty_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SubmissionStore::new(dir.path().join("leads"));

        let path = store
            .persist(&booking("BK1"), SubmissionLayout::Partitioned, at(2026, 11))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("leads/2026/11/BK1.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"id\": \"BK1\""));
        let stored: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(stored["visitType"], "online");
    }

    #[tokio::test]
    async fn test_same_id_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SubmissionStore::new(dir.path());

        let mut first = booking("BK1");
        first.set("note", "first");
        let mut second = booking("BK1");
        second.set("note", "second");

        store.persist(&first, SubmissionLayout::Flat, at(2026, 1)).await.unwrap();
        let path = store.persist(&second, SubmissionLayout::Flat, at(2026, 1)).await.unwrap();

        let stored: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(stored["note"], "second");
    }

    #[tokio::test]
    async fn test_concurrent_writes_into_new_partition() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SubmissionStore::new(dir.path());
        let (a, b) = (booking("BK_A"), booking("BK_B"));

        let (ra, rb) = tokio::join!(
            store.persist(&a, SubmissionLayout::Partitioned, at(2027, 2)),
            store.persist(&b, SubmissionLayout::Partitioned, at(2027, 2)),
        );

        assert!(ra.unwrap().exists());
        assert!(rb.unwrap().exists());
    }

    #[tokio::test]
    async fn test_write_failure_reports_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        // a regular file where the partition directory should go
        std::fs::write(dir.path().join("2026"), b"blocker").unwrap();
        let store = SubmissionStore::new(dir.path());

        let err = store
            .persist(&booking("BK1"), SubmissionLayout::Partitioned, at(2026, 5))
            .await
            .unwrap_err();
        assert!(err.is_server_error());
        assert!(err.to_string().starts_with("Failed to create directory"));
    }

    #[tokio::test]
    async fn test_append_log_one_line_per_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SubmissionStore::new(dir.path());

        store.append_log(&booking("L1")).await.unwrap();
        store.append_log(&booking("L2")).await.unwrap();

        let log = std::fs::read_to_string(store.log_path()).unwrap();
        let ids: Vec<String> = log
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["L1", "L2"]);
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/srv/data");
        let path = Path::new("/srv/data/leads/2026/10/BK1.json");
        assert_eq!(
            SubmissionStore::relative_to(path, root),
            "leads/2026/10/BK1.json"
        );
    }
}
