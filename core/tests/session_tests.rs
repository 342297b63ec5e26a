use pretty_assertions::assert_eq;
use proptest::prelude::*;

use pumplog_core::mock::{
    ManualClock, MemoryStore, RecordingChart, RecordingDownloader, RecordingNotifier,
};
use pumplog_core::{
    evaluate_alert, AlertDecision, Capabilities, LoggerConfig, PermissionState, PumpLogError,
    PumpLogger, ReadingInput,
};

const START: i64 = 1_700_000_000_000;

struct Host {
    store: MemoryStore,
    notifier: RecordingNotifier,
    chart: RecordingChart,
    downloader: RecordingDownloader,
    clock: ManualClock,
}

impl Host {
    fn new(permission: PermissionState) -> Self {
        Self {
            store: MemoryStore::new(),
            notifier: RecordingNotifier::new(permission),
            chart: RecordingChart::new(),
            downloader: RecordingDownloader::new(),
            clock: ManualClock::new(START),
        }
    }

    fn session(&self) -> PumpLogger {
        self.session_with(LoggerConfig::default())
    }

    fn session_with(&self, config: LoggerConfig) -> PumpLogger {
        let capabilities = Capabilities {
            store: Box::new(self.store.clone()),
            notifier: Box::new(self.notifier.clone()),
            chart: Box::new(self.chart.clone()),
            downloader: Box::new(self.downloader.clone()),
        };
        PumpLogger::start(config, capabilities, Box::new(self.clock.clone())).unwrap()
    }
}

fn reading(tank: &str, pump: &str, depth: &str, status: &str, notes: &str) -> ReadingInput {
    ReadingInput {
        tank: tank.to_string(),
        pump: pump.to_string(),
        depth: depth.to_string(),
        status: status.to_string(),
        notes: notes.to_string(),
    }
}

/// Split exported CSV into records, honoring double-quoted fields.
fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match (quoted, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => quoted = false,
            (true, c) => field.push(c),
            (false, '"') => quoted = true,
            (false, ',') => row.push(std::mem::take(&mut field)),
            (false, '\n') => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (false, c) => field.push(c),
        }
    }
    row.push(field);
    rows.push(row);
    rows
}

#[test]
fn test_example_scenario() {
    let host = Host::new(PermissionState::Granted);
    let logger = host.session();
    assert_eq!(logger.threshold(), 0.5);
    assert!(logger.readings().is_empty());

    let first = logger
        .submit_reading(reading("T1", "P1", "0.3", "ok", "low"))
        .unwrap();
    assert_eq!(logger.readings().len(), 1);
    assert_eq!(first.decision, AlertDecision::Breach);
    assert_eq!(
        first.warning.as_deref(),
        Some("Alert: T1 P1 depth 0.3 m below threshold 0.5 m")
    );
    assert_eq!(
        host.notifier.shown(),
        vec![("Pump Alert".to_string(), "T1 P1 depth 0.3 m".to_string())]
    );

    host.clock.advance(60_000);
    let second = logger
        .submit_reading(reading("T1", "P1", "0.8", "ok", ""))
        .unwrap();
    assert_eq!(logger.readings().len(), 2);
    assert_eq!(second.decision, AlertDecision::Ok);
    assert_eq!(second.warning, None);
    assert_eq!(host.notifier.shown().len(), 1);

    let export = logger.export_csv().unwrap();
    let rows = parse_csv(&export.content);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].join(","), "id,tank,pump,depth,status,notes,timestamp");
    assert_eq!(rows[1][3], "0.3");
    assert_eq!(rows[1][5], "low");
    assert_eq!(rows[2][3], "0.8");
    assert_eq!(rows[2][5], "");

    let series = logger.plot("T1".to_string(), "P1".to_string()).unwrap();
    let depths: Vec<f64> = series.points.iter().map(|p| p.depth).collect();
    assert_eq!(depths, vec![0.3, 0.8]);

    let rendered = logger.render();
    assert_eq!(rendered[0].depth, "0.8 m");
    assert_eq!(rendered[1].notes, "low");
}

#[test]
fn test_submission_echoes_input() {
    let host = Host::new(PermissionState::Denied);
    let logger = host.session();
    let outcome = logger
        .submit_reading(reading("T2", "P2", "3.75", "warning", "checked, \"fine\""))
        .unwrap();

    let readings = logger.readings();
    let record = &readings[0];
    assert_eq!(record, &outcome.record);
    assert_eq!(record.tank, "T2");
    assert_eq!(record.pump, "P2");
    assert_eq!(record.depth, 3.75);
    assert_eq!(record.status, "warning");
    assert_eq!(record.notes, "checked, \"fine\"");
    assert_eq!(record.created_at, START);
}

#[test]
fn test_invalid_depth_leaves_log_unchanged() {
    let host = Host::new(PermissionState::Granted);
    let logger = host.session();
    logger
        .submit_reading(reading("T1", "P1", "1.0", "ok", ""))
        .unwrap();

    for bad in ["", "abc", "   ", "--1"] {
        let err = logger
            .submit_reading(reading("T1", "P1", bad, "ok", ""))
            .unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid depth");
    }
    assert_eq!(logger.readings().len(), 1);
    assert_eq!(host.store.write_count(), 1);
}

#[test]
fn test_clear_requires_confirmation_and_persists() {
    let host = Host::new(PermissionState::Granted);
    let logger = host.session();
    logger
        .submit_reading(reading("T1", "P1", "1.0", "ok", ""))
        .unwrap();

    assert!(logger.confirm_clear().is_err());
    assert_eq!(logger.readings().len(), 1);

    logger.request_clear();
    logger.confirm_clear().unwrap();
    assert!(logger.readings().is_empty());
    assert!(host.session().readings().is_empty());
}

#[test]
fn test_log_survives_restart() {
    let host = Host::new(PermissionState::Granted);
    {
        let logger = host.session();
        logger
            .submit_reading(reading("T1", "P1", "1.0", "ok", "a"))
            .unwrap();
        host.clock.advance(1);
        logger
            .submit_reading(reading("T3", "P2", "2.0", "fault", "b"))
            .unwrap();
    }
    let reloaded = host.session();
    let notes: Vec<String> = reloaded.readings().into_iter().map(|r| r.notes).collect();
    assert_eq!(notes, vec!["a", "b"]);
}

#[test]
fn test_storage_failure_does_not_corrupt_session() {
    let host = Host::new(PermissionState::Granted);
    let logger = host.session();
    logger
        .submit_reading(reading("T1", "P1", "1.0", "ok", ""))
        .unwrap();

    host.store.fail_writes(true);
    let err = logger
        .submit_reading(reading("T1", "P1", "0.1", "ok", ""))
        .unwrap_err();
    assert!(matches!(err, PumpLogError::Persistence(_)));
    assert_eq!(logger.readings().len(), 1);
    assert!(host.notifier.shown().is_empty());

    logger.request_clear();
    assert!(logger.confirm_clear().is_err());
    assert_eq!(logger.readings().len(), 1);
}

#[test]
fn test_permission_requested_once_until_answered() {
    let host = Host::new(PermissionState::Undetermined);
    let logger = host.session();
    assert_eq!(host.notifier.permission_requests(), 1);

    for _ in 0..3 {
        let outcome = logger
            .submit_reading(reading("T1", "P1", "0.1", "ok", ""))
            .unwrap();
        assert!(outcome.warning.is_some());
    }
    assert_eq!(host.notifier.permission_requests(), 1);
    assert!(host.notifier.shown().is_empty());

    host.notifier.answer(PermissionState::Granted);
    logger
        .submit_reading(reading("T1", "P1", "0.1", "ok", ""))
        .unwrap();
    assert_eq!(host.notifier.shown().len(), 1);
}

#[test]
fn test_notification_failure_does_not_block_save() {
    let host = Host::new(PermissionState::Granted);
    host.notifier.fail_show(true);
    let logger = host.session();

    let outcome = logger
        .submit_reading(reading("T1", "P1", "0.1", "ok", ""))
        .unwrap();
    assert_eq!(outcome.decision, AlertDecision::Breach);
    assert_eq!(logger.readings().len(), 1);
}

#[test]
fn test_plot_orders_by_creation_time() {
    let host = Host::new(PermissionState::Denied);
    let logger = host.session();

    host.clock.set(START + 30_000);
    logger
        .submit_reading(reading("T1", "P1", "3", "ok", ""))
        .unwrap();
    host.clock.set(START + 10_000);
    logger
        .submit_reading(reading("T1", "P1", "1", "ok", ""))
        .unwrap();
    logger
        .submit_reading(reading("T1", "P2", "9", "ok", ""))
        .unwrap();
    host.clock.set(START + 20_000);
    logger
        .submit_reading(reading("T1", "P1", "2", "ok", ""))
        .unwrap();

    let series = logger.plot("T1".to_string(), "P1".to_string()).unwrap();
    let depths: Vec<f64> = series.points.iter().map(|p| p.depth).collect();
    assert_eq!(depths, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.label, "T1 - P1");

    let err = logger
        .plot("T2".to_string(), "P1".to_string())
        .unwrap_err();
    assert_eq!(err.to_string(), "No logs for selected pump");
    assert_eq!(host.chart.rendered().len(), 1);
}

#[test]
fn test_configured_session() {
    let host = Host::new(PermissionState::Granted);
    let config = LoggerConfig::from_toml_str(
        r#"
        tanks = ["North"]
        pumps = ["Main"]
        statuses = ["running"]
        default_threshold = 2.0

        [storage]
        logs_key = "custom_logs"
        threshold_key = "custom_threshold"

        [display]
        timestamp_format = "%H:%M"
        utc_offset_minutes = 0

        [alerts]
        notification_title = "Low water"
        "#,
    )
    .unwrap();
    let logger = host.session_with(config);
    assert_eq!(logger.tanks(), vec!["North"]);
    assert_eq!(logger.threshold(), 2.0);

    logger
        .submit_reading(reading("North", "Main", "1.5", "running", ""))
        .unwrap();
    assert!(host.store.value("custom_logs").is_some());
    assert_eq!(host.notifier.shown()[0].0, "Low water");
    assert_eq!(logger.render()[0].timestamp, "22:13");
}

#[test]
fn test_configured_names_export_as_single_fields() {
    let host = Host::new(PermissionState::Denied);
    let config = LoggerConfig::from_toml_str(
        r#"
        tanks = ["North East", "Tank #2"]
        pumps = ["Pump #2"]
        statuses = ["running ok"]
        "#,
    )
    .unwrap();
    let logger = host.session_with(config);
    logger
        .submit_reading(reading(
            "North East",
            "Pump #2",
            "1.25",
            "running ok",
            "a, \"b\"",
        ))
        .unwrap();

    let export = logger.export_csv().unwrap();
    let rows = parse_csv(&export.content);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].len(), 7);
    assert_eq!(
        rows[1][1..6].to_vec(),
        vec!["North East", "Pump #2", "1.25", "running ok", "a, \"b\""]
    );
}

#[test]
fn test_startup_skips_stored_logs_without_depth() {
    let host = Host::new(PermissionState::Granted);
    host.store.insert(
        "pump_logs_v1",
        r#"[{"id":1,"tank":"T1","pump":"P1","depth":null,"status":"ok","notes":"","ts":1},{"id":2,"tank":"T2","pump":"P2","depth":0.4,"status":"warning","notes":"kept","ts":2}]"#,
    );
    let logger = host.session();
    let readings = logger.readings();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].notes, "kept");
    assert_eq!(logger.render().len(), 1);
}

proptest! {
    #[test]
    fn prop_alert_iff_strictly_below(depth in -100.0f64..100.0, threshold in -100.0f64..100.0) {
        let decision = evaluate_alert(depth, threshold);
        prop_assert_eq!(decision == AlertDecision::Breach, depth < threshold);
    }

    #[test]
    fn prop_csv_round_trips_fields(
        entries in prop::collection::vec(
            ("[ -~\n]{0,24}", 0u32..100_000u32),
            1..8,
        )
    ) {
        let host = Host::new(PermissionState::Denied);
        let logger = host.session();
        for (notes, centimeters) in &entries {
            let depth = format!("{}", f64::from(*centimeters) / 100.0);
            logger.submit_reading(reading("T2", "P1", &depth, "ok", notes)).unwrap();
            host.clock.advance(1);
        }

        let export = logger.export_csv().unwrap();
        let rows = parse_csv(&export.content);
        let records = logger.readings();
        prop_assert_eq!(rows.len(), records.len() + 1);
        for (row, record) in rows[1..].iter().zip(&records) {
            prop_assert_eq!(row.len(), 7);
            prop_assert_eq!(&row[0], &record.id.to_string());
            prop_assert_eq!(&row[1], &record.tank);
            prop_assert_eq!(&row[2], &record.pump);
            prop_assert_eq!(row[3].parse::<f64>().unwrap(), record.depth);
            prop_assert_eq!(&row[4], &record.status);
            prop_assert_eq!(&row[5], &record.notes);
            prop_assert_eq!(&row[6], &record.created_at.to_string());
        }
    }
}
