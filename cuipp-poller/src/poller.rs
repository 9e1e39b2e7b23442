//! Per-device polling sessions
//!
//! Every registered phone gets its own background task. A tick sleeps for the
//! session interval, fetches one snapshot and compares the watched field with
//! the last value seen. Ticks of one session never overlap because the next
//! sleep starts only after the previous fetch has finished.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use cuipp_client::PhoneEndpoint;
use cuipp_xml::DeviceSnapshot;
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::{PollerError, PollerResult};
use crate::session::{
    ChangeCallback, ChangeDetector, PollingSession, Registration, SessionCounters, SessionState,
    SessionStats, DEFAULT_POLL_INTERVAL,
};
use crate::source::SnapshotSource;

/// Settings shared by every session of a poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Interval for registrations that do not set one. Default: 60 seconds
    pub default_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            default_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Owns the polling sessions of every registered phone.
///
/// Dropping the poller cancels all sessions.
pub struct DevicePoller {
    source: Arc<dyn SnapshotSource>,
    config: PollerConfig,
    runtime: Handle,
    sessions: Mutex<HashMap<PhoneEndpoint, PollingSession>>,
}

impl DevicePoller {
    /// Create a poller on the current tokio runtime.
    pub fn new(source: Arc<dyn SnapshotSource>) -> PollerResult<Self> {
        Self::with_config(source, PollerConfig::default())
    }

    pub fn with_config(source: Arc<dyn SnapshotSource>, config: PollerConfig) -> PollerResult<Self> {
        let runtime = Handle::try_current().map_err(|e| PollerError::NoRuntime(e.to_string()))?;
        Ok(Self::with_handle(source, config, runtime))
    }

    /// Create a poller whose tasks run on `runtime`
    pub fn with_handle(source: Arc<dyn SnapshotSource>, config: PollerConfig, runtime: Handle) -> Self {
        Self {
            source,
            config,
            runtime,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start watching a phone.
    ///
    /// A zero interval records the registration without ever ticking. Any
    /// session already registered for the same endpoint is cancelled first.
    pub fn register<F>(&self, registration: Registration, on_change: F) -> PollerResult<SessionState>
    where
        F: Fn(DeviceSnapshot) + Send + Sync + 'static,
    {
        if registration.watched_field.trim().is_empty() {
            return Err(PollerError::InvalidRegistration(format!(
                "no watched field for {}",
                registration.endpoint
            )));
        }

        let Registration {
            endpoint,
            interval,
            watched_field,
            initial_snapshot,
        } = registration;
        let interval = interval.unwrap_or(self.config.default_interval);

        let detector = ChangeDetector::new(watched_field.clone(), &initial_snapshot);
        let last_seen = Arc::new(RwLock::new(detector.last_seen().map(str::to_owned)));
        let counters = Arc::new(SessionCounters::default());
        let active = Arc::new(Mutex::new(true));

        let task = if interval.is_zero() {
            debug!(phone = %endpoint, "Polling disabled, registering idle session");
            None
        } else {
            let tick = TickContext {
                endpoint: endpoint.clone(),
                interval,
                detector,
                on_change: Arc::new(on_change),
                source: Arc::clone(&self.source),
                last_seen: Arc::clone(&last_seen),
                counters: Arc::clone(&counters),
                active: Arc::clone(&active),
            };
            Some(self.runtime.spawn(tick.run()))
        };

        let session = PollingSession {
            endpoint: endpoint.clone(),
            interval,
            watched_field,
            started_at: SystemTime::now(),
            last_seen,
            counters,
            active,
            task,
        };
        let state = session.state();

        let previous = self.sessions.lock().insert(endpoint.clone(), session);
        if let Some(previous) = previous {
            debug!(phone = %endpoint, "Replacing existing polling session");
            previous.cancel();
        }

        info!(phone = %endpoint, state = %state, interval_ms = interval.as_millis() as u64, "Registered device");
        Ok(state)
    }

    /// Stop watching a phone. Returns false if it was not registered.
    ///
    /// No callback fires for this endpoint after the call returns, including
    /// for a tick whose request was already in flight. If a callback is running
    /// when this is called, it finishes first, so a callback must not
    /// deregister its own endpoint.
    pub fn deregister(&self, endpoint: &PhoneEndpoint) -> bool {
        let removed = self.sessions.lock().remove(endpoint);
        match removed {
            Some(session) => {
                session.cancel();
                info!(phone = %endpoint, "Deregistered device");
                true
            }
            None => false,
        }
    }

    pub fn state(&self, endpoint: &PhoneEndpoint) -> Option<SessionState> {
        self.sessions.lock().get(endpoint).map(PollingSession::state)
    }

    pub fn is_polling(&self, endpoint: &PhoneEndpoint) -> bool {
        self.state(endpoint) == Some(SessionState::Polling)
    }

    pub fn is_registered(&self, endpoint: &PhoneEndpoint) -> bool {
        self.sessions.lock().contains_key(endpoint)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Last value of the watched field seen for `endpoint`
    pub fn last_seen(&self, endpoint: &PhoneEndpoint) -> Option<String> {
        self.sessions
            .lock()
            .get(endpoint)
            .and_then(PollingSession::last_seen)
    }

    pub fn session_stats(&self, endpoint: &PhoneEndpoint) -> Option<SessionStats> {
        self.sessions.lock().get(endpoint).map(PollingSession::stats)
    }

    pub fn stats(&self) -> PollerStats {
        let sessions = self.sessions.lock();
        let mut session_stats: Vec<SessionStats> = sessions.values().map(PollingSession::stats).collect();
        session_stats.sort_by(|a, b| a.endpoint.to_string().cmp(&b.endpoint.to_string()));

        PollerStats {
            total_sessions: sessions.len(),
            polling_sessions: session_stats
                .iter()
                .filter(|s| s.state == SessionState::Polling)
                .count(),
            default_interval: self.config.default_interval,
            session_stats,
        }
    }

    /// Cancel every session
    pub fn shutdown_all(&self) {
        let drained: Vec<PollingSession> = self.sessions.lock().drain().map(|(_, s)| s).collect();
        for session in drained {
            debug!(phone = %session.endpoint, "Stopping polling session");
            session.cancel();
        }
    }
}

impl Drop for DevicePoller {
    fn drop(&mut self) {
        self.shutdown_all();
    }
}

impl fmt::Debug for DevicePoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevicePoller")
            .field("config", &self.config)
            .field("sessions", &self.session_count())
            .finish()
    }
}

/// Everything one session's task owns
struct TickContext {
    endpoint: PhoneEndpoint,
    interval: Duration,
    detector: ChangeDetector,
    on_change: ChangeCallback,
    source: Arc<dyn SnapshotSource>,
    last_seen: Arc<RwLock<Option<String>>>,
    counters: Arc<SessionCounters>,
    active: Arc<Mutex<bool>>,
}

impl TickContext {
    fn cancelled(&self) -> bool {
        !*self.active.lock()
    }

    /// Compare `snapshot` and fire the callback on a change. Returns false
    /// once the session has been cancelled.
    fn deliver(&mut self, snapshot: DeviceSnapshot) -> bool {
        let active = self.active.lock();
        if !*active {
            return false;
        }

        if self.detector.observe(&snapshot) {
            *self.last_seen.write() = self.detector.last_seen().map(str::to_owned);
            self.counters.changes.fetch_add(1, Ordering::Relaxed);
            info!(
                phone = %self.endpoint,
                field = self.detector.watched_field(),
                value = ?self.detector.last_seen(),
                "Watched field changed"
            );
            (self.on_change)(snapshot);
        }
        true
    }

    async fn run(mut self) {
        debug!(
            phone = %self.endpoint,
            field = self.detector.watched_field(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting polling session"
        );

        loop {
            tokio::time::sleep(self.interval).await;
            if self.cancelled() {
                break;
            }

            self.counters.polls.fetch_add(1, Ordering::Relaxed);

            match self.source.fetch(&self.endpoint).await {
                Ok(snapshot) => {
                    if !self.deliver(snapshot) {
                        break;
                    }
                }
                Err(e) => {
                    self.counters.errors.fetch_add(1, Ordering::Relaxed);
                    warn!(phone = %self.endpoint, error = %e, "Polling tick failed");
                }
            }
        }

        debug!(phone = %self.endpoint, "Polling session ended");
    }
}

/// Snapshot of every session a poller owns
#[derive(Debug, Clone)]
pub struct PollerStats {
    pub total_sessions: usize,
    pub polling_sessions: usize,
    pub default_interval: Duration,
    pub session_stats: Vec<SessionStats>,
}

impl fmt::Display for PollerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Device Poller Stats:")?;
        writeln!(
            f,
            "  Sessions: {} ({} polling)",
            self.total_sessions, self.polling_sessions
        )?;
        writeln!(f, "  Default interval: {:?}", self.default_interval)?;

        if !self.session_stats.is_empty() {
            writeln!(f, "  Session details:")?;
            for stat in &self.session_stats {
                writeln!(
                    f,
                    "    {} [{}] (interval: {:?}, polls: {}, errors: {}, changes: {})",
                    stat.endpoint,
                    stat.state,
                    stat.interval,
                    stat.poll_count,
                    stat.error_count,
                    stat.change_count
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cuipp_client::PhoneError;

    struct FixedSource;

    #[async_trait]
    impl SnapshotSource for FixedSource {
        async fn fetch(&self, _endpoint: &PhoneEndpoint) -> Result<DeviceSnapshot, PhoneError> {
            Ok([("MessageWaiting", "No")].into_iter().collect())
        }
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = DevicePoller::new(Arc::new(FixedSource));
        assert!(matches!(result, Err(PollerError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn test_empty_watched_field_rejected() {
        let poller = DevicePoller::new(Arc::new(FixedSource)).unwrap();
        let registration = Registration::new(PhoneEndpoint::new("phone")).watch("  ");

        let result = poller.register(registration, |_| {});
        assert!(matches!(result, Err(PollerError::InvalidRegistration(_))));
        assert_eq!(poller.session_count(), 0);
    }

    #[tokio::test]
    async fn test_default_interval_applies() {
        let poller = DevicePoller::new(Arc::new(FixedSource)).unwrap();
        let endpoint = PhoneEndpoint::new("phone");

        let state = poller.register(Registration::new(endpoint.clone()), |_| {}).unwrap();
        assert_eq!(state, SessionState::Polling);

        let stats = poller.session_stats(&endpoint).unwrap();
        assert_eq!(stats.interval, Duration::from_secs(60));
        assert_eq!(stats.poll_count, 0);
    }

    #[tokio::test]
    async fn test_stats_display() {
        let poller = DevicePoller::new(Arc::new(FixedSource)).unwrap();
        poller
            .register(Registration::new(PhoneEndpoint::new("a")).interval_ms(0), |_| {})
            .unwrap();
        poller
            .register(Registration::new(PhoneEndpoint::new("b")), |_| {})
            .unwrap();

        let stats = poller.stats();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.polling_sessions, 1);

        let rendered = stats.to_string();
        assert!(rendered.contains("Sessions: 2 (1 polling)"));
        assert!(rendered.contains("a:80 [idle]"));
        assert!(rendered.contains("b:80 [polling]"));
    }

    #[tokio::test]
    async fn test_shutdown_all_clears_sessions() {
        let poller = DevicePoller::new(Arc::new(FixedSource)).unwrap();
        poller
            .register(Registration::new(PhoneEndpoint::new("a")), |_| {})
            .unwrap();
        poller.shutdown_all();
        assert_eq!(poller.session_count(), 0);
    }
}
