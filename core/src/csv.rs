use crate::error::{CapabilityError, PumpLogError};
use crate::models::{CsvExport, LogRecord};

pub const CSV_HEADER: &str = "id,tank,pump,depth,status,notes,timestamp";
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Host facility that saves text content as a downloaded file.
pub trait FileDownloader: Send + Sync {
    fn save(&self, filename: String, mime_type: String, content: String)
        -> Result<(), CapabilityError>;
}

/// Serialize `records` in collection order.
///
/// Only `notes` is quoted; every other column is numeric or drawn from a
/// configured set.
pub fn export(records: &[LogRecord], now_millis: i64) -> Result<CsvExport, PumpLogError> {
    if records.is_empty() {
        return Err(PumpLogError::NothingToExport);
    }

    let mut content = String::from(CSV_HEADER);
    for record in records {
        content.push('\n');
        content.push_str(&row(record));
    }

    Ok(CsvExport {
        filename: format!("pump_logs_{}.csv", now_millis),
        mime_type: CSV_MIME_TYPE.to_string(),
        content,
    })
}

fn row(record: &LogRecord) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        record.id,
        record.tank,
        record.pump,
        record.depth,
        record.status,
        quote(&record.notes),
        record.created_at
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
