use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::error::{CapabilityError, PumpLogError};
use crate::input::parse_number;
use crate::models::LogRecord;

/// Host string store, get/set by key. No transactions.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: String) -> Option<String>;
    fn set(&self, key: String, value: String) -> Result<(), CapabilityError>;
}

/// Typed access to the two persisted slots. The only code that touches the
/// host store.
pub struct PersistenceAdapter {
    store: Box<dyn KeyValueStore>,
    logs_key: String,
    threshold_key: String,
}

impl PersistenceAdapter {
    pub fn new(store: Box<dyn KeyValueStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            logs_key: config.logs_key.clone(),
            threshold_key: config.threshold_key.clone(),
        }
    }

    /// Load the log collection. A missing slot is an empty collection.
    ///
    /// Entries stored with a `null` depth (written by older clients from an
    /// unparsable field) are skipped; any other malformed entry fails the load.
    pub fn load_logs(&self) -> Result<Vec<LogRecord>, PumpLogError> {
        let Some(raw) = self.store.get(self.logs_key.clone()) else {
            debug!(key = %self.logs_key, "no stored logs");
            return Ok(Vec::new());
        };
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| self.corrupt(e))?;

        let mut logs = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.get("depth").is_some_and(serde_json::Value::is_null) {
                warn!(
                    key = %self.logs_key,
                    id = ?entry.get("id"),
                    "skipping stored log without depth"
                );
                continue;
            }
            logs.push(serde_json::from_value(entry).map_err(|e| self.corrupt(e))?);
        }
        Ok(logs)
    }

    pub fn save_logs(&self, logs: &[LogRecord]) -> Result<(), PumpLogError> {
        let raw = serde_json::to_string(logs).map_err(|e| self.corrupt(e))?;
        self.store.set(self.logs_key.clone(), raw)?;
        debug!(key = %self.logs_key, count = logs.len(), "stored logs");
        Ok(())
    }

    /// Load the threshold, falling back to `default` when absent or unreadable.
    pub fn load_threshold(&self, default: f64) -> f64 {
        match self.store.get(self.threshold_key.clone()) {
            None => default,
            Some(raw) => parse_number(&raw).unwrap_or_else(|| {
                warn!(key = %self.threshold_key, value = %raw, "unreadable threshold, using default");
                default
            }),
        }
    }

    pub fn save_threshold(&self, threshold: f64) -> Result<(), PumpLogError> {
        self.store
            .set(self.threshold_key.clone(), threshold.to_string())?;
        Ok(())
    }

    fn corrupt(&self, err: serde_json::Error) -> PumpLogError {
        PumpLogError::CorruptStorage {
            key: self.logs_key.clone(),
            message: err.to_string(),
        }
    }
}
