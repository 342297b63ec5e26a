pub mod alert;
pub mod chart;
pub mod clock;
pub mod config;
pub mod csv;
pub mod error;
pub mod input;
pub mod logging;
pub mod mock;
pub mod models;
pub mod panels;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;

uniffi::include_scaffolding!("pumplog");

pub use alert::{evaluate as evaluate_alert, NotificationCapability};
pub use chart::ChartCapability;
pub use config::LoggerConfig;
pub use csv::FileDownloader;
pub use error::{CapabilityError, PumpLogError};
pub use logging::init_logging;
pub use models::{
    AlertDecision, ChartPoint, ChartSeries, CsvExport, DisplayEntry, LogRecord, Panel,
    PanelState, PermissionState, ReadingInput, SubmitOutcome,
};
pub use session::{Capabilities, PumpLogger};
pub use storage::KeyValueStore;
