//! Results Store - the JSON file shared by the runner and the analyzer
//!
//! The store is held in memory and written out whole. It is never re-read
//! between appends: the runner owns the only copy for the duration of a
//! sweep and flushes it according to its [`FlushPolicy`](crate::runner::FlushPolicy).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::ExperimentRecord;
use crate::{Error, Result};

/// File name prefix for stores written by a sweep.
pub const FILE_PREFIX: &str = "testtopptopk_";

/// Ordered, append-only collection of experiment records.
///
/// Serializes to `{"results": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsStore {
    results: Vec<ExperimentRecord>,
}

impl ResultsStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store for analysis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLoad`] if the file is missing, unreadable, or
    /// not a valid store document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data_load = |reason: String| Error::DataLoad {
            path: path.display().to_string(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| data_load(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| data_load(e.to_string()))
    }

    /// Load an existing store to append to, or start empty if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLoad`] if the file exists but cannot be read or
    /// parsed. An unreadable store is never silently replaced.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(Error::DataLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Write the whole store, pretty-printed with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| Error::Storage(format!("cannot write {}: {e}", path.display())))
    }

    /// Append a record.
    pub fn push(&mut self, record: ExperimentRecord) {
        self.results.push(record);
    }

    /// Remove and return the most recent record.
    pub fn pop(&mut self) -> Option<ExperimentRecord> {
        self.results.pop()
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ExperimentRecord] {
        &self.results
    }

    /// Get the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Store file name for a sweep started at `now`: `testtopptopk_YYYYMMDD_HHMMSS.json`.
#[must_use]
pub fn file_name_for<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{FILE_PREFIX}{}.json", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SamplingParams;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(top_p: f64, top_k: u32) -> ExperimentRecord {
        ExperimentRecord::new("llama3.2", "prompt", SamplingParams::new(top_p, top_k), 1.5, "a b c")
    }

    #[test]
    fn test_store_default() {
        let store = ResultsStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_empty_store_shape() {
        let json = serde_json::to_value(ResultsStore::new()).unwrap();
        assert_eq!(json, serde_json::json!({"results": []}));
    }

    #[test]
    fn test_save_uses_two_space_indent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut store = ResultsStore::new();
        store.push(record(0.1, 10));
        store.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"results\": [\n    {\n      \"timestamp\""));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ResultsStore::load_or_default(temp_dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_or_default_keeps_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut store = ResultsStore::new();
        store.push(record(0.2, 25));
        store.save(&path).unwrap();

        let loaded = ResultsStore::load_or_default(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_or_default_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{\"results\": [").unwrap();

        let result = ResultsStore::load_or_default(&path);
        assert!(matches!(result, Err(Error::DataLoad { .. })));
    }

    #[test]
    fn test_save_to_missing_directory_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no/such/dir/store.json");
        let result = ResultsStore::new().save(&path);
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[test]
    fn test_file_name_for() {
        let now = Utc.with_ymd_and_hms(2025, 2, 5, 9, 21, 49).unwrap();
        assert_eq!(file_name_for(&now), "testtopptopk_20250205_092149.json");
    }
}
