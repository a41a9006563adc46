//! Readings log - append-only CSV storage
//!
//! History store for ingested readings and, offline, the training corpus
//! for the classifier artifact. Rows are `timestamp,temperature,humidity,gas`
//! with a header written at creation.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use parking_lot::Mutex;
use thiserror::Error;

use crate::models::ReadingRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only CSV log of sensor readings.
///
/// Appends reopen the file per call and serialize on a mutex so concurrent
/// requests cannot interleave rows. Reads take no lock; a row that is mid
/// write is simply picked up by the next poll.
pub struct ReadingStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl ReadingStore {
    /// Open the log at `path`, creating it (and parent directories) with a
    /// header row when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(["timestamp", "temperature", "humidity", "gas"])?;
            writer.flush()?;
            tracing::info!("Created readings log at {}", path.display());
        }

        Ok(Self {
            path,
            append_lock: Mutex::new(()),
        })
    }

    /// Append one record to the log.
    pub fn append(&self, record: &ReadingRecord) -> Result<(), StoreError> {
        let _guard = self.append_lock.lock();

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    /// Most recent record, if the log holds any.
    pub fn latest(&self) -> Result<Option<ReadingRecord>, StoreError> {
        Ok(self.read_all()?.pop())
    }

    /// Up to `limit` most recent records, oldest first.
    pub fn tail(&self, limit: usize) -> Result<Vec<ReadingRecord>, StoreError> {
        let mut records = self.read_all()?;
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }

    fn read_all(&self) -> Result<Vec<ReadingRecord>, StoreError> {
        let mut reader = csv::Reader::from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.deserialize::<ReadingRecord>() {
            match row {
                Ok(record) => records.push(record),
                // tolerate hand-edited or truncated rows
                Err(e) => tracing::debug!("Skipping malformed row: {}", e),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str, t: f64) -> ReadingRecord {
        ReadingRecord {
            timestamp: ts.to_string(),
            temperature: t,
            humidity: 65.0,
            gas: 150.0,
        }
    }

    #[test]
    fn test_open_creates_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("sensor_data.csv");

        let store = ReadingStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.latest().unwrap().map(|r| r.timestamp), None);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("timestamp,temperature,humidity,gas"));
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("log.csv")).unwrap();

        store.append(&record("2026-08-06T10:00:00Z", 21.0)).unwrap();
        store.append(&record("2026-08-06T10:00:05Z", 22.0)).unwrap();

        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest.timestamp, "2026-08-06T10:00:05Z");
        assert_eq!(latest.temperature, 22.0);

        let all = store.tail(100).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].temperature, 21.0);
    }

    #[test]
    fn test_tail_keeps_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("log.csv")).unwrap();

        for i in 0..10 {
            store.append(&record(&format!("t{i}"), i as f64)).unwrap();
        }

        let tail = store.tail(3).unwrap();
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].timestamp, "t7");
        assert_eq!(tail[2].timestamp, "t9");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let store = ReadingStore::open(&path).unwrap();

        store.append(&record("t0", 20.0)).unwrap();
        fs::write(
            &path,
            fs::read_to_string(&path).unwrap() + "t1,not-a-number,65.0,150.0\n",
        )
        .unwrap();
        store.append(&record("t2", 22.0)).unwrap();

        let all = store.tail(100).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].timestamp, "t2");
    }

    #[test]
    fn test_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        {
            let store = ReadingStore::open(&path).unwrap();
            store.append(&record("t0", 20.0)).unwrap();
        }

        let store = ReadingStore::open(&path).unwrap();
        assert_eq!(store.tail(100).unwrap().len(), 1);
    }
}
