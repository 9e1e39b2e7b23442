//! # cuipp-bridge
//!
//! Exposes Cisco IP phones as simple home-automation accessories. Each phone
//! becomes a contact sensor or a light that follows its message-waiting
//! indicator, and named actions push execute commands back to the handset.
//!
//! Configuration is the platform JSON block described in [`config`]. See
//! [`PhonePlatform`] for the runtime entry point.

pub mod accessory;
pub mod config;
pub mod device_info;
pub mod error;
pub mod logging;
pub mod platform;

pub use accessory::{Accessory, AccessoryEvent, AccessoryKind, AccessoryState};
pub use config::{
    ActionConfiguration, DeviceType, ExecItemConfiguration, PhoneConfiguration, PlatformConfig,
    PriorityValue, DEFAULT_POLLING_INTERVAL_MS,
};
pub use device_info::{DeviceInformation, MANUFACTURER};
pub use error::{BridgeError, BridgeResult};
pub use logging::{init_logging, init_logging_from_env, LoggingMode};
pub use platform::{PhonePlatform, StateCallback};
