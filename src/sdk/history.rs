use super::trip::TripRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_HISTORY_FILE: &str = "fueltracker_history.json";
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("History data is malformed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("No trip at index {index} (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unsupported export version: {0}")]
    UnsupportedVersion(String),
}

/// Totals shown alongside the history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub trips: usize,
    pub total_distance_km: f64,
    pub total_cost: f64,
    pub avg_cost_per_km: f64,
}

impl HistorySummary {
    pub fn from_records(records: &[TripRecord]) -> Self {
        let total_distance_km: f64 = records.iter().map(|r| r.distance_km).sum();
        let total_cost: f64 = records.iter().map(|r| r.cost_total).sum();
        let avg_cost_per_km = if total_distance_km > 0.0 {
            total_cost / total_distance_km
        } else {
            0.0
        };
        Self {
            trips: records.len(),
            total_distance_km,
            total_cost,
            avg_cost_per_km,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub history: Vec<TripRecord>,
}

/// Ordered trip history, oldest first.
///
/// Implementations persist the whole collection on every mutation; the last
/// writer wins.
pub trait HistoryStore {
    fn load_all(&self) -> Result<Vec<TripRecord>, HistoryError>;

    fn replace_all(&mut self, records: Vec<TripRecord>) -> Result<(), HistoryError>;

    fn append(&mut self, record: TripRecord) -> Result<(), HistoryError> {
        let mut records = self.load_all()?;
        records.push(record);
        self.replace_all(records)
    }

    fn remove_at(&mut self, index: usize) -> Result<TripRecord, HistoryError> {
        let mut records = self.load_all()?;
        if index >= records.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index);
        self.replace_all(records)?;
        Ok(removed)
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.replace_all(Vec::new())
    }

    fn summary(&self) -> Result<HistorySummary, HistoryError> {
        Ok(HistorySummary::from_records(&self.load_all()?))
    }

    fn export_json(&self, exported_at: DateTime<Utc>) -> Result<String, HistoryError> {
        let bundle = HistoryExport {
            version: EXPORT_VERSION.to_string(),
            exported_at,
            history: self.load_all()?,
        };
        Ok(serde_json::to_string_pretty(&bundle)?)
    }

    /// Replaces the stored history with the one in an export bundle.
    fn import_json(&mut self, json: &str) -> Result<usize, HistoryError> {
        let bundle: HistoryExport = serde_json::from_str(json)?;
        if bundle.version != EXPORT_VERSION {
            return Err(HistoryError::UnsupportedVersion(bundle.version));
        }
        let count = bundle.history.len();
        self.replace_all(bundle.history)?;
        Ok(count)
    }
}

/// History kept in a single JSON file, rewritten in full on each change.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn load_all(&self) -> Result<Vec<TripRecord>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn replace_all(&mut self, records: Vec<TripRecord>) -> Result<(), HistoryError> {
        let data = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, data)?;
        log::debug!("Saved {} trips to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryHistoryStore {
    records: Vec<TripRecord>,
}

impl HistoryStore for InMemoryHistoryStore {
    fn load_all(&self) -> Result<Vec<TripRecord>, HistoryError> {
        Ok(self.records.clone())
    }

    fn replace_all(&mut self, records: Vec<TripRecord>) -> Result<(), HistoryError> {
        self.records = records;
        Ok(())
    }
}
