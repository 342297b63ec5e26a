//! The logging session exposed to the UI shell.
//!
//! Every handler follows one direction: validate the event, mutate the store,
//! and hand back whatever the shell needs to redraw. The shell re-reads
//! `render()` after each mutation.

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::alert::{self, AlertNotifier, NotificationCapability};
use crate::chart::{self, ChartCapability, ChartView};
use crate::clock::{Clock, SystemClock, TimeDisplay};
use crate::config::LoggerConfig;
use crate::csv::{self, FileDownloader};
use crate::error::PumpLogError;
use crate::input::parse_number;
use crate::models::{
    AlertDecision, ChartSeries, CsvExport, DisplayEntry, LogRecord, Panel, PanelState,
    ReadingInput, SubmitOutcome,
};
use crate::panels::Panels;
use crate::render;
use crate::storage::{KeyValueStore, PersistenceAdapter};
use crate::store::LogStore;

pub const CLEAR_PROMPT: &str = "Clear all logs?";
pub const SETTINGS_SAVED: &str = "Settings saved";

/// Host facilities a session is built from.
pub struct Capabilities {
    pub store: Box<dyn KeyValueStore>,
    pub notifier: Box<dyn NotificationCapability>,
    pub chart: Box<dyn ChartCapability>,
    pub downloader: Box<dyn FileDownloader>,
}

/// Host callbacks for notifications and charts run with only their own lock
/// held, never the session state lock, so a host may call back into the
/// session from inside them.
pub struct PumpLogger {
    config: LoggerConfig,
    time: TimeDisplay,
    clock: Box<dyn Clock>,
    downloader: Box<dyn FileDownloader>,
    state: Mutex<SessionState>,
    notifier: Mutex<AlertNotifier>,
    chart: Mutex<ChartView>,
}

struct SessionState {
    logs: LogStore,
    threshold: f64,
    panels: Panels,
    clear_requested: bool,
}

impl PumpLogger {
    /// Session with the default configuration.
    pub fn new(
        store: Box<dyn KeyValueStore>,
        notifier: Box<dyn NotificationCapability>,
        chart: Box<dyn ChartCapability>,
        downloader: Box<dyn FileDownloader>,
    ) -> Result<Self, PumpLogError> {
        let capabilities = Capabilities {
            store,
            notifier,
            chart,
            downloader,
        };
        Self::start(LoggerConfig::default(), capabilities, Box::new(SystemClock))
    }

    /// Session configured from a TOML document.
    pub fn with_config(
        config_toml: String,
        store: Box<dyn KeyValueStore>,
        notifier: Box<dyn NotificationCapability>,
        chart: Box<dyn ChartCapability>,
        downloader: Box<dyn FileDownloader>,
    ) -> Result<Self, PumpLogError> {
        let config = LoggerConfig::from_toml_str(&config_toml)?;
        let capabilities = Capabilities {
            store,
            notifier,
            chart,
            downloader,
        };
        Self::start(config, capabilities, Box::new(SystemClock))
    }

    /// Load persisted state and prime notification permission.
    pub fn start(
        config: LoggerConfig,
        capabilities: Capabilities,
        clock: Box<dyn Clock>,
    ) -> Result<Self, PumpLogError> {
        config.validate()?;

        let persistence = PersistenceAdapter::new(capabilities.store, &config.storage);
        let threshold = persistence.load_threshold(config.default_threshold);
        let logs = LogStore::load(persistence)?;

        let mut notifier =
            AlertNotifier::new(capabilities.notifier, config.alerts.notification_title.clone());
        notifier.prime();

        info!(readings = logs.len(), threshold, "pump logger session started");

        Ok(Self {
            time: TimeDisplay::from_config(&config.display),
            config,
            clock,
            downloader: capabilities.downloader,
            state: Mutex::new(SessionState {
                logs,
                threshold,
                panels: Panels::default(),
                clear_requested: false,
            }),
            notifier: Mutex::new(notifier),
            chart: Mutex::new(ChartView::new(capabilities.chart)),
        })
    }

    pub fn tanks(&self) -> Vec<String> {
        self.config.tanks.clone()
    }

    pub fn pumps(&self) -> Vec<String> {
        self.config.pumps.clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.config.statuses.clone()
    }

    /// Validate and record a reading, then run the threshold check.
    pub fn submit_reading(&self, input: ReadingInput) -> Result<SubmitOutcome, PumpLogError> {
        let depth = parse_number(&input.depth).ok_or_else(|| PumpLogError::InvalidDepth {
            input: input.depth.clone(),
        })?;
        check_choice(&self.config.tanks, &input.tank, PumpLogError::UnknownTank)?;
        check_choice(&self.config.pumps, &input.pump, PumpLogError::UnknownPump)?;
        check_choice(&self.config.statuses, &input.status, PumpLogError::UnknownStatus)?;

        let (record, threshold) = {
            let mut state = self.state.lock();
            state.clear_requested = false;
            let now = self.clock.now_millis();
            let record = LogRecord {
                id: state.logs.next_id(now),
                tank: input.tank,
                pump: input.pump,
                depth,
                status: input.status,
                notes: input.notes,
                created_at: now,
            };
            state.logs.append(record.clone())?;
            (record, state.threshold)
        };
        info!(id = record.id, tank = %record.tank, pump = %record.pump, depth, "reading saved");

        let decision = alert::evaluate(record.depth, threshold);
        let warning = match decision {
            AlertDecision::Breach => {
                let outcome = self.notifier.lock().notify(&record);
                info!(id = record.id, threshold, ?outcome, "depth below threshold");
                Some(alert::warning_message(&record, threshold))
            }
            AlertDecision::Ok => None,
        };

        Ok(SubmitOutcome {
            record,
            decision,
            warning,
        })
    }

    pub fn readings(&self) -> Vec<LogRecord> {
        self.state.lock().logs.all().to_vec()
    }

    pub fn render(&self) -> Vec<DisplayEntry> {
        let state = self.state.lock();
        render::render(state.logs.all(), &self.time)
    }

    /// Start the clear-all flow; the returned prompt must be confirmed.
    pub fn request_clear(&self) -> String {
        self.state.lock().clear_requested = true;
        CLEAR_PROMPT.to_string()
    }

    pub fn cancel_clear(&self) {
        self.state.lock().clear_requested = false;
    }

    pub fn confirm_clear(&self) -> Result<(), PumpLogError> {
        let mut state = self.state.lock();
        if !state.clear_requested {
            return Err(PumpLogError::ClearNotRequested);
        }
        state.clear_requested = false;
        let removed = state.logs.len();
        state.logs.clear()?;
        info!(removed, "all readings cleared");
        Ok(())
    }

    /// Serialize the log and hand it to the host download facility.
    pub fn export_csv(&self) -> Result<CsvExport, PumpLogError> {
        let export = {
            let state = self.state.lock();
            csv::export(state.logs.all(), self.clock.now_millis())?
        };
        self.downloader
            .save(
                export.filename.clone(),
                export.mime_type.clone(),
                export.content.clone(),
            )
            .map_err(PumpLogError::Download)?;
        info!(filename = %export.filename, "csv exported");
        Ok(export)
    }

    pub fn threshold(&self) -> f64 {
        self.state.lock().threshold
    }

    /// Show the settings panel; returns the value to pre-fill.
    pub fn open_settings(&self) -> String {
        let mut state = self.state.lock();
        state.panels.open(Panel::Settings);
        state.threshold.to_string()
    }

    pub fn close_settings(&self) {
        self.state.lock().panels.close(Panel::Settings);
    }

    /// Store a new threshold. Unreadable input stores the configured default.
    pub fn save_threshold(&self, input: String) -> Result<String, PumpLogError> {
        let threshold = parse_number(&input).unwrap_or(self.config.default_threshold);
        let mut state = self.state.lock();
        state.clear_requested = false;
        state.logs.persistence().save_threshold(threshold)?;
        state.threshold = threshold;
        state.panels.close(Panel::Settings);
        info!(threshold, "threshold saved");
        Ok(SETTINGS_SAVED.to_string())
    }

    pub fn open_chart(&self) {
        self.state.lock().panels.open(Panel::Chart);
    }

    pub fn close_chart(&self) {
        self.state.lock().panels.close(Panel::Chart);
        self.chart.lock().teardown();
    }

    /// Plot `tank`/`pump`, replacing any chart already shown.
    pub fn plot(&self, tank: String, pump: String) -> Result<ChartSeries, PumpLogError> {
        let series = {
            let state = self.state.lock();
            chart::plot(state.logs.all(), &tank, &pump, &self.time)?
        };
        self.chart.lock().show(series.clone())?;
        debug!(tank = %tank, pump = %pump, points = series.points.len(), "plotted");
        Ok(series)
    }

    pub fn panel_state(&self, panel: Panel) -> PanelState {
        self.state.lock().panels.state(panel)
    }
}

fn check_choice(
    allowed: &[String],
    value: &str,
    err: fn(String) -> PumpLogError,
) -> Result<(), PumpLogError> {
    if allowed.iter().any(|a| a == value) {
        Ok(())
    } else {
        Err(err(value.to_string()))
    }
}
