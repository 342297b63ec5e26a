use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::config::DisplayConfig;

/// Source of the current time, in Unix epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Formats epoch-millisecond timestamps for people.
#[derive(Clone, Debug)]
pub struct TimeDisplay {
    pattern: String,
    offset: Option<FixedOffset>,
}

impl TimeDisplay {
    /// A display in a fixed offset from UTC, or in the local zone when `offset` is `None`.
    pub fn new(pattern: impl Into<String>, offset: Option<FixedOffset>) -> Self {
        Self {
            pattern: pattern.into(),
            offset,
        }
    }

    pub fn utc(pattern: impl Into<String>) -> Self {
        Self::new(pattern, FixedOffset::east_opt(0))
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        let offset = config
            .utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60));
        Self::new(config.timestamp_format.clone(), offset)
    }

    pub fn format(&self, millis: i64) -> String {
        let Some(instant) = DateTime::<Utc>::from_timestamp_millis(millis) else {
            return millis.to_string();
        };
        match self.offset {
            Some(offset) => instant
                .with_timezone(&offset)
                .format(&self.pattern)
                .to_string(),
            None => instant
                .with_timezone(&Local)
                .format(&self.pattern)
                .to_string(),
        }
    }
}
