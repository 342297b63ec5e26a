//! Threshold alerts.
//!
//! A reading breaches when its depth is strictly below the threshold. A breach
//! always produces an in-app warning; a system notification is shown only if
//! the host has already granted permission. Notification failures never reach
//! the caller.

use tracing::{debug, warn};

use crate::error::CapabilityError;
use crate::models::{AlertDecision, LogRecord, PermissionState};

/// Host notification facility.
pub trait NotificationCapability: Send + Sync {
    fn permission_state(&self) -> PermissionState;
    /// Ask the user for permission. The answer arrives later, if ever.
    fn request_permission(&self);
    fn show(&self, title: String, body: String) -> Result<(), CapabilityError>;
}

pub fn evaluate(depth: f64, threshold: f64) -> AlertDecision {
    if depth < threshold {
        AlertDecision::Breach
    } else {
        AlertDecision::Ok
    }
}

pub fn warning_message(record: &LogRecord, threshold: f64) -> String {
    format!(
        "Alert: {} {} depth {} m below threshold {} m",
        record.tank, record.pump, record.depth, threshold
    )
}

pub fn notification_body(record: &LogRecord) -> String {
    format!("{} {} depth {} m", record.tank, record.pump, record.depth)
}

/// What happened on the system-notification side of a breach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyOutcome {
    Shown,
    PermissionRequested,
    /// Permission undetermined and a request is already outstanding.
    AwaitingPermission,
    Skipped,
    Failed,
}

/// Sends system notifications, asking for permission at most once until the
/// user answers.
pub struct AlertNotifier {
    capability: Box<dyn NotificationCapability>,
    title: String,
    request_pending: bool,
}

impl AlertNotifier {
    pub fn new(capability: Box<dyn NotificationCapability>, title: impl Into<String>) -> Self {
        Self {
            capability,
            title: title.into(),
            request_pending: false,
        }
    }

    /// Request permission up front if the user has not decided yet.
    pub fn prime(&mut self) {
        if self.capability.permission_state() == PermissionState::Undetermined {
            self.request();
        }
    }

    pub fn notify(&mut self, record: &LogRecord) -> NotifyOutcome {
        match self.capability.permission_state() {
            PermissionState::Granted => {
                self.request_pending = false;
                match self.capability.show(self.title.clone(), notification_body(record)) {
                    Ok(()) => NotifyOutcome::Shown,
                    Err(err) => {
                        warn!(error = %err, "system notification failed");
                        NotifyOutcome::Failed
                    }
                }
            }
            PermissionState::Undetermined if self.request_pending => {
                NotifyOutcome::AwaitingPermission
            }
            PermissionState::Undetermined => {
                self.request();
                NotifyOutcome::PermissionRequested
            }
            state @ (PermissionState::Denied | PermissionState::Unsupported) => {
                self.request_pending = false;
                debug!(?state, "system notification skipped");
                NotifyOutcome::Skipped
            }
        }
    }

    fn request(&mut self) {
        debug!("requesting notification permission");
        self.capability.request_permission();
        self.request_pending = true;
    }
}
