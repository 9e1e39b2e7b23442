//! Scripted snapshot source for poller tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cuipp_client::{PhoneEndpoint, PhoneError, TransportError};
use cuipp_poller::SnapshotSource;
use cuipp_xml::DeviceSnapshot;
use parking_lot::Mutex;

/// One scripted reply
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Snapshot with `MessageWaiting` set to the given value
    Waiting(&'static str),
    /// Snapshot without `MessageWaiting`
    Missing,
    /// Transport failure
    Fail,
}

/// Replays a fixed sequence of replies per host, then fails every call.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch takes `delay` of (paused) time before replying
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn script(self, host: &str, steps: &[Step]) -> Self {
        self.scripts
            .lock()
            .insert(host.to_string(), steps.iter().copied().collect());
        self
    }

    pub fn calls(&self, host: &str) -> usize {
        self.calls.lock().get(host).copied().unwrap_or(0)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch(&self, endpoint: &PhoneEndpoint) -> Result<DeviceSnapshot, PhoneError> {
        *self.calls.lock().entry(endpoint.host().to_string()).or_insert(0) += 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let step = self
            .scripts
            .lock()
            .get_mut(endpoint.host())
            .and_then(VecDeque::pop_front)
            .unwrap_or(Step::Fail);

        match step {
            Step::Waiting(value) => Ok(waiting(value)),
            Step::Missing => Ok([("HostName", "SEP001122334455")].into_iter().collect()),
            Step::Fail => Err(TransportError::Network("connection refused".to_string()).into()),
        }
    }
}

pub fn waiting(value: &str) -> DeviceSnapshot {
    [("HostName", "SEP001122334455"), ("MessageWaiting", value)]
        .into_iter()
        .collect()
}

/// Collects the `MessageWaiting` value of every snapshot the poller reports
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<Option<String>>>>,
}

impl Recorder {
    pub fn callback(&self) -> impl Fn(DeviceSnapshot) + Send + Sync + 'static {
        let seen = Arc::clone(&self.seen);
        move |snapshot: DeviceSnapshot| {
            seen.lock()
                .push(snapshot.get("MessageWaiting").map(str::to_owned));
        }
    }

    pub fn values(&self) -> Vec<Option<String>> {
        self.seen.lock().clone()
    }
}
