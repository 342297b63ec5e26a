//! Depth-over-time series for one tank/pump pair.

use tracing::debug;

use crate::clock::TimeDisplay;
use crate::error::{CapabilityError, PumpLogError};
use crate::models::{ChartPoint, ChartSeries, LogRecord};

pub const Y_AXIS_TITLE: &str = "Depth (m)";

/// Host line-chart widget.
pub trait ChartCapability: Send + Sync {
    /// Render `series` and return a handle to the new chart instance.
    fn render(&self, series: ChartSeries) -> Result<u64, CapabilityError>;
    fn destroy(&self, handle: u64);
}

/// Build the series for `tank`/`pump`, oldest reading first.
pub fn plot(
    records: &[LogRecord],
    tank: &str,
    pump: &str,
    time: &TimeDisplay,
) -> Result<ChartSeries, PumpLogError> {
    let mut selected: Vec<&LogRecord> = records
        .iter()
        .filter(|r| r.tank == tank && r.pump == pump)
        .collect();
    if selected.is_empty() {
        return Err(PumpLogError::NoMatchingReadings {
            tank: tank.to_string(),
            pump: pump.to_string(),
        });
    }
    // Stable: equal timestamps keep insertion order.
    selected.sort_by_key(|r| r.created_at);

    Ok(ChartSeries {
        label: format!("{} - {}", tank, pump),
        y_axis_title: Y_AXIS_TITLE.to_string(),
        points: selected
            .into_iter()
            .map(|r| ChartPoint {
                label: time.format(r.created_at),
                depth: r.depth,
            })
            .collect(),
    })
}

/// Owns the single chart instance shown in the chart panel.
pub struct ChartView {
    capability: Box<dyn ChartCapability>,
    active: Option<u64>,
}

impl ChartView {
    pub fn new(capability: Box<dyn ChartCapability>) -> Self {
        Self {
            capability,
            active: None,
        }
    }

    /// Replace whatever is shown with `series`.
    pub fn show(&mut self, series: ChartSeries) -> Result<(), PumpLogError> {
        self.teardown();
        let handle = self
            .capability
            .render(series)
            .map_err(PumpLogError::Chart)?;
        debug!(handle, "chart rendered");
        self.active = Some(handle);
        Ok(())
    }

    pub fn teardown(&mut self) {
        if let Some(handle) = self.active.take() {
            debug!(handle, "chart destroyed");
            self.capability.destroy(handle);
        }
    }

    pub fn active(&self) -> Option<u64> {
        self.active
    }
}
