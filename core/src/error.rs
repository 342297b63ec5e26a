use thiserror::Error;

/// Error type for every session operation exposed to the UI shell.
///
/// The `Display` text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PumpLogError {
    #[error("Enter a valid depth")]
    InvalidDepth { input: String },

    #[error("unknown tank: {0}")]
    UnknownTank(String),

    #[error("unknown pump: {0}")]
    UnknownPump(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("No logs to export")]
    NothingToExport,

    #[error("No logs for selected pump")]
    NoMatchingReadings { tank: String, pump: String },

    #[error("no clear request is pending")]
    ClearNotRequested,

    #[error("storage error: {0}")]
    Persistence(#[from] CapabilityError),

    #[error("download failed: {0}")]
    Download(CapabilityError),

    #[error("chart failed: {0}")]
    Chart(CapabilityError),

    #[error("stored {key} is corrupt: {message}")]
    CorruptStorage { key: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),
}

/// Error raised by a host capability (storage, notifications, chart, download).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    #[error("capability unavailable")]
    Unavailable,

    #[error("capability failed: {reason}")]
    Failed { reason: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for CapabilityError {
    fn from(err: uniffi::UnexpectedUniFFICallbackError) -> Self {
        CapabilityError::Failed { reason: err.reason }
    }
}
