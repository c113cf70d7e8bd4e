//! Forecast archive over the key-value store.
//!
//! Keeps the N most recent daily records, most recent first. The latest
//! record is the "pending" forecast; older records feed multi-day battle
//! analysis until they age out of the retention window.

use chrono::NaiveDate;
use std::sync::Arc;

use wxduel_core::error::StorageError;
use wxduel_core::storage::KeyValueStore;

use crate::record::ForecastRecord;

const HISTORY_KEY: &str = "forecast_history";

pub struct ForecastArchive {
    store: Arc<dyn KeyValueStore>,
    retention_days: usize,
}

impl ForecastArchive {
    pub fn new(store: Arc<dyn KeyValueStore>, retention_days: usize) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    /// Save a record, replacing any record already saved on the same date.
    ///
    /// History stays sorted most-recent-first and truncated to the retention
    /// window.
    pub fn save(&self, record: ForecastRecord) -> Result<(), StorageError> {
        let mut history = self.history();

        if let Some(existing) = history
            .iter_mut()
            .find(|r| r.saved_date == record.saved_date)
        {
            *existing = record;
        } else {
            history.push(record);
        }

        history.sort_by(|a, b| b.saved_date.cmp(&a.saved_date));
        history.truncate(self.retention_days);

        self.store.set_json(HISTORY_KEY, &history)
    }

    /// All retained records, most recent first. Missing or corrupt history
    /// degrades to empty.
    pub fn history(&self) -> Vec<ForecastRecord> {
        self.store.get_json(HISTORY_KEY).unwrap_or_default()
    }

    /// The pending (most recently saved) record.
    pub fn latest(&self) -> Option<ForecastRecord> {
        self.history().into_iter().next()
    }

    /// The record saved on a specific date, if retained.
    pub fn record_for(&self, date: NaiveDate) -> Option<ForecastRecord> {
        self.history().into_iter().find(|r| r.saved_date == date)
    }

    pub fn clear(&self) {
        self.store.remove(HISTORY_KEY);
    }

    /// Indices of a record's days that are eligible for verification:
    /// target date strictly before `today`. A record saved today has
    /// nothing to verify — observations for today don't exist yet.
    pub fn verifiable_days(record: &ForecastRecord, today: NaiveDate) -> Vec<usize> {
        if record.saved_date >= today {
            return Vec::new();
        }

        record
            .model_a
            .days
            .iter()
            .enumerate()
            .filter(|(_, day)| day.date < today)
            .map(|(i, _)| i)
            .collect()
    }
}
