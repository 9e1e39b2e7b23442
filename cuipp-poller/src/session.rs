//! Registration data and per-device session state

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use cuipp_client::PhoneEndpoint;
use cuipp_xml::DeviceSnapshot;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Field the bridge watches on `/DeviceInformationX`
pub const MESSAGE_WAITING_FIELD: &str = "MessageWaiting";

/// Interval used when a registration does not name one
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(60_000);

/// Invoked with the new snapshot each time the watched field changes
pub type ChangeCallback = Arc<dyn Fn(DeviceSnapshot) + Send + Sync>;

/// What to poll and how often.
///
/// ```rust
/// use cuipp_client::PhoneEndpoint;
/// use cuipp_poller::Registration;
///
/// let registration = Registration::new(PhoneEndpoint::new("10.0.0.20"))
///     .interval_ms(30_000)
///     .watch("MessageWaiting");
/// assert_eq!(registration.watched_field(), "MessageWaiting");
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    pub(crate) endpoint: PhoneEndpoint,
    pub(crate) interval: Option<Duration>,
    pub(crate) watched_field: String,
    pub(crate) initial_snapshot: DeviceSnapshot,
}

impl Registration {
    pub fn new(endpoint: PhoneEndpoint) -> Self {
        Self {
            endpoint,
            interval: None,
            watched_field: MESSAGE_WAITING_FIELD.to_string(),
            initial_snapshot: DeviceSnapshot::new(),
        }
    }

    /// Polling interval. Zero disables polling for the life of the registration.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn interval_ms(self, millis: u64) -> Self {
        self.interval(Duration::from_millis(millis))
    }

    pub fn watch(mut self, field: impl Into<String>) -> Self {
        self.watched_field = field.into();
        self
    }

    /// Snapshot the first tick is compared against
    pub fn initial_snapshot(mut self, snapshot: DeviceSnapshot) -> Self {
        self.initial_snapshot = snapshot;
        self
    }

    pub fn endpoint(&self) -> &PhoneEndpoint {
        &self.endpoint
    }

    pub fn watched_field(&self) -> &str {
        &self.watched_field
    }
}

/// Whether a registered device has a timer armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Interval was zero; no tick will ever run
    Idle,
    Polling,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Polling => write!(f, "polling"),
        }
    }
}

/// Compares one field across successive snapshots.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    watched_field: String,
    last_seen: Option<String>,
}

impl ChangeDetector {
    pub fn new(watched_field: impl Into<String>, initial: &DeviceSnapshot) -> Self {
        let watched_field = watched_field.into();
        let last_seen = initial.get(&watched_field).map(str::to_owned);
        Self {
            watched_field,
            last_seen,
        }
    }

    /// Record `snapshot`, returning true if the watched field differs from
    /// the last value seen. A missing field counts as a value of its own.
    pub fn observe(&mut self, snapshot: &DeviceSnapshot) -> bool {
        let current = snapshot.get(&self.watched_field);
        if current == self.last_seen.as_deref() {
            return false;
        }
        self.last_seen = current.map(str::to_owned);
        true
    }

    pub fn watched_field(&self) -> &str {
        &self.watched_field
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionCounters {
    pub(crate) polls: AtomicU64,
    pub(crate) errors: AtomicU64,
    pub(crate) changes: AtomicU64,
}

/// A registered device and, while polling, its background task
#[derive(Debug)]
pub struct PollingSession {
    pub(crate) endpoint: PhoneEndpoint,
    pub(crate) interval: Duration,
    pub(crate) watched_field: String,
    pub(crate) started_at: SystemTime,
    pub(crate) last_seen: Arc<RwLock<Option<String>>>,
    pub(crate) counters: Arc<SessionCounters>,
    /// Cleared on cancel. The task holds this lock while it delivers a change.
    pub(crate) active: Arc<Mutex<bool>>,
    pub(crate) task: Option<JoinHandle<()>>,
}

impl PollingSession {
    pub fn endpoint(&self) -> &PhoneEndpoint {
        &self.endpoint
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn watched_field(&self) -> &str {
        &self.watched_field
    }

    pub fn state(&self) -> SessionState {
        if self.task.is_some() {
            SessionState::Polling
        } else {
            SessionState::Idle
        }
    }

    pub fn last_seen(&self) -> Option<String> {
        self.last_seen.read().clone()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            endpoint: self.endpoint.clone(),
            state: self.state(),
            interval: self.interval,
            started_at: self.started_at,
            poll_count: self.counters.polls.load(Ordering::Relaxed),
            error_count: self.counters.errors.load(Ordering::Relaxed),
            change_count: self.counters.changes.load(Ordering::Relaxed),
        }
    }

    /// Stop the session. A tick already waiting on the phone is dropped and
    /// its result never reaches the callback. A callback that is already
    /// running finishes before this returns.
    pub(crate) fn cancel(self) {
        *self.active.lock() = false;
        if let Some(task) = self.task {
            task.abort();
        }
    }
}

/// Point-in-time counters for one session
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub endpoint: PhoneEndpoint,
    pub state: SessionState,
    pub interval: Duration,
    pub started_at: SystemTime,
    pub poll_count: u64,
    pub error_count: u64,
    pub change_count: u64,
}
