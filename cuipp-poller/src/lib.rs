//! # cuipp-poller
//!
//! Periodic telemetry polling for Cisco IP phones with change detection on a
//! single watched field.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cuipp_client::{PhoneClient, PhoneEndpoint};
//! use cuipp_poller::{DevicePoller, Registration};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let poller = DevicePoller::new(Arc::new(PhoneClient::new()))?;
//!
//! let endpoint = PhoneEndpoint::new("10.0.0.20");
//! poller.register(Registration::new(endpoint.clone()).interval_ms(30_000), |snapshot| {
//!     println!("MessageWaiting is now {:?}", snapshot.get("MessageWaiting"));
//! })?;
//!
//! // Later
//! poller.deregister(&endpoint);
//! # Ok(())
//! # }
//! ```
//!
//! A failed tick is logged and the session carries on at its normal
//! interval. Deregistering is idempotent.

pub mod error;
pub mod poller;
pub mod session;
pub mod source;

pub use error::{PollerError, PollerResult};
pub use poller::{DevicePoller, PollerConfig, PollerStats};
pub use session::{
    ChangeCallback, ChangeDetector, PollingSession, Registration, SessionState, SessionStats,
    DEFAULT_POLL_INTERVAL, MESSAGE_WAITING_FIELD,
};
pub use source::SnapshotSource;
