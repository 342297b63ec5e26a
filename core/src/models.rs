use serde::{Deserialize, Serialize};

/// One recorded depth reading for a tank/pump pair. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: u64,
    pub tank: String,
    pub pump: String,
    /// Depth in meters.
    pub depth: f64,
    pub status: String,
    #[serde(default)]
    pub notes: String,
    /// Creation time as Unix epoch milliseconds.
    #[serde(rename = "ts")]
    pub created_at: i64,
}

/// Raw form values as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct ReadingInput {
    pub tank: String,
    pub pump: String,
    pub depth: String,
    pub status: String,
    pub notes: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertDecision {
    Ok,
    Breach,
}

/// Result of a successful submission.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub record: LogRecord,
    pub decision: AlertDecision,
    /// Acknowledgable warning to show immediately, present on breach.
    pub warning: Option<String>,
}

/// One row of the reading list, already formatted for display.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayEntry {
    pub id: u64,
    pub tank: String,
    pub pump: String,
    pub depth: String,
    pub status: String,
    pub timestamp: String,
    pub notes: String,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub depth: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub y_axis_title: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Undetermined,
    /// The host has no notification facility at all.
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Settings,
    Chart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    Visible,
}
