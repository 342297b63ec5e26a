//! Projection of the reading log into display rows.

use crate::clock::TimeDisplay;
use crate::models::{DisplayEntry, LogRecord};

/// Display rows for `records`, most recent first.
pub fn render(records: &[LogRecord], time: &TimeDisplay) -> Vec<DisplayEntry> {
    records
        .iter()
        .rev()
        .map(|record| display_entry(record, time))
        .collect()
}

pub fn display_entry(record: &LogRecord, time: &TimeDisplay) -> DisplayEntry {
    let depth = format!("{} m", record.depth);
    DisplayEntry {
        id: record.id,
        tank: record.tank.clone(),
        pump: record.pump.clone(),
        summary: format!(
            "{} - {} | Depth: {} | {}",
            record.tank, record.pump, depth, record.status
        ),
        depth,
        status: record.status.clone(),
        timestamp: time.format(record.created_at),
        notes: record.notes.clone(),
    }
}
