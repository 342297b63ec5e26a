//! In-memory capability implementations for tests and headless hosts.
//!
//! Each mock is a cheap handle over shared state, so a clone can be boxed into
//! a session while the original is kept around for inspection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::alert::NotificationCapability;
use crate::chart::ChartCapability;
use crate::clock::Clock;
use crate::csv::FileDownloader;
use crate::error::CapabilityError;
use crate::models::{ChartSeries, CsvExport, PermissionState};
use crate::storage::KeyValueStore;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreState>>,
}

#[derive(Debug, Default)]
struct MemoryStoreState {
    values: HashMap<String, String>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .values
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.lock().values.get(key).cloned()
    }

    /// Make every subsequent `set` fail until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: String) -> Option<String> {
        self.inner.lock().values.get(&key).cloned()
    }

    fn set(&self, key: String, value: String) -> Result<(), CapabilityError> {
        let mut state = self.inner.lock();
        if state.fail_writes {
            return Err(CapabilityError::Failed {
                reason: "quota exceeded".to_string(),
            });
        }
        state.writes += 1;
        state.values.insert(key, value);
        Ok(())
    }
}

/// Notification host whose permission answer is set by the test.
#[derive(Clone, Debug)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<NotifierState>>,
}

#[derive(Debug)]
struct NotifierState {
    permission: PermissionState,
    permission_requests: usize,
    shown: Vec<(String, String)>,
    fail_show: bool,
}

impl RecordingNotifier {
    pub fn new(permission: PermissionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifierState {
                permission,
                permission_requests: 0,
                shown: Vec::new(),
                fail_show: false,
            })),
        }
    }

    /// Simulate the user answering the permission prompt.
    pub fn answer(&self, permission: PermissionState) {
        self.inner.lock().permission = permission;
    }

    pub fn fail_show(&self, fail: bool) {
        self.inner.lock().fail_show = fail;
    }

    pub fn permission_requests(&self) -> usize {
        self.inner.lock().permission_requests
    }

    /// `(title, body)` of every displayed notification.
    pub fn shown(&self) -> Vec<(String, String)> {
        self.inner.lock().shown.clone()
    }
}

impl NotificationCapability for RecordingNotifier {
    fn permission_state(&self) -> PermissionState {
        self.inner.lock().permission
    }

    fn request_permission(&self) {
        self.inner.lock().permission_requests += 1;
    }

    fn show(&self, title: String, body: String) -> Result<(), CapabilityError> {
        let mut state = self.inner.lock();
        if state.fail_show {
            return Err(CapabilityError::Unavailable);
        }
        state.shown.push((title, body));
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingChart {
    inner: Arc<Mutex<ChartState>>,
}

#[derive(Debug, Default)]
struct ChartState {
    next_handle: u64,
    live: Vec<u64>,
    rendered: Vec<ChartSeries>,
    destroyed: Vec<u64>,
}

impl RecordingChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles rendered and not yet destroyed.
    pub fn live_handles(&self) -> Vec<u64> {
        self.inner.lock().live.clone()
    }

    pub fn rendered(&self) -> Vec<ChartSeries> {
        self.inner.lock().rendered.clone()
    }

    pub fn destroyed(&self) -> Vec<u64> {
        self.inner.lock().destroyed.clone()
    }
}

impl ChartCapability for RecordingChart {
    fn render(&self, series: ChartSeries) -> Result<u64, CapabilityError> {
        let mut state = self.inner.lock();
        state.next_handle += 1;
        let handle = state.next_handle;
        state.live.push(handle);
        state.rendered.push(series);
        Ok(handle)
    }

    fn destroy(&self, handle: u64) {
        let mut state = self.inner.lock();
        state.live.retain(|h| *h != handle);
        state.destroyed.push(handle);
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingDownloader {
    inner: Arc<Mutex<Vec<CsvExport>>>,
}

impl RecordingDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<CsvExport> {
        self.inner.lock().clone()
    }
}

impl FileDownloader for RecordingDownloader {
    fn save(
        &self,
        filename: String,
        mime_type: String,
        content: String,
    ) -> Result<(), CapabilityError> {
        self.inner.lock().push(CsvExport {
            filename,
            mime_type,
            content,
        });
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Clone, Debug)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
