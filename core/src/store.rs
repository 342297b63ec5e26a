use tracing::info;

use crate::error::PumpLogError;
use crate::models::LogRecord;
use crate::storage::PersistenceAdapter;

/// The session's reading collection, kept in step with persistence.
///
/// Mutations write the candidate collection first and only commit it in memory
/// once the write succeeded, so a failed write leaves the visible state intact.
pub struct LogStore {
    records: Vec<LogRecord>,
    persistence: PersistenceAdapter,
}

impl LogStore {
    pub fn load(persistence: PersistenceAdapter) -> Result<Self, PumpLogError> {
        let records = persistence.load_logs()?;
        info!(count = records.len(), "loaded readings");
        Ok(Self {
            records,
            persistence,
        })
    }

    pub fn append(&mut self, record: LogRecord) -> Result<(), PumpLogError> {
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.extend_from_slice(&self.records);
        next.push(record);
        self.persistence.save_logs(&next)?;
        self.records = next;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), PumpLogError> {
        self.persistence.save_logs(&[])?;
        self.records.clear();
        Ok(())
    }

    /// Records in insertion order.
    pub fn all(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Allocate an id for a record created at `now_millis`.
    ///
    /// Ids are strictly increasing: the clock value is used unless it does not
    /// exceed the largest id already held.
    pub fn next_id(&self, now_millis: i64) -> u64 {
        let candidate = u64::try_from(now_millis).unwrap_or(0);
        match self.records.iter().map(|r| r.id).max() {
            Some(last) if candidate <= last => last + 1,
            _ => candidate,
        }
    }

    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }
}
