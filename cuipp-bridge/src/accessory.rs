//! Accessory model: how a phone's message-waiting indicator is presented

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DeviceType;
use crate::device_info::DeviceInformation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessoryKind {
    ContactSensor,
    Light,
}

impl From<DeviceType> for AccessoryKind {
    fn from(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Contact => Self::ContactSensor,
            DeviceType::Light => Self::Light,
        }
    }
}

/// State reported to the automation host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessoryState {
    ContactDetected,
    /// A waiting message opens the contact
    ContactNotDetected,
    LightOn,
    LightOff,
}

impl AccessoryState {
    pub fn from_message_waiting(kind: AccessoryKind, message_waiting: bool) -> Self {
        match (kind, message_waiting) {
            (AccessoryKind::ContactSensor, true) => Self::ContactNotDetected,
            (AccessoryKind::ContactSensor, false) => Self::ContactDetected,
            (AccessoryKind::Light, true) => Self::LightOn,
            (AccessoryKind::Light, false) => Self::LightOff,
        }
    }

    pub fn from_information(kind: AccessoryKind, information: &DeviceInformation) -> Self {
        Self::from_message_waiting(kind, information.message_waiting())
    }

    /// Whether this state means a message is waiting
    pub fn is_active(self) -> bool {
        matches!(self, Self::ContactNotDetected | Self::LightOn)
    }
}

impl fmt::Display for AccessoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContactDetected => write!(f, "contact detected"),
            Self::ContactNotDetected => write!(f, "contact not detected"),
            Self::LightOn => write!(f, "on"),
            Self::LightOff => write!(f, "off"),
        }
    }
}

/// A registered phone as the automation host sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessory {
    pub host: String,
    pub kind: AccessoryKind,
    pub information: DeviceInformation,
    pub state: AccessoryState,
}

impl Accessory {
    pub fn new(host: impl Into<String>, kind: AccessoryKind, information: DeviceInformation) -> Self {
        let state = AccessoryState::from_information(kind, &information);
        Self {
            host: host.into(),
            kind,
            information,
            state,
        }
    }

    pub fn name(&self) -> &str {
        self.information.display_name(&self.host)
    }

    /// Replace the device information and recompute the state
    pub(crate) fn update(&mut self, information: DeviceInformation) {
        self.state = AccessoryState::from_information(self.kind, &information);
        self.information = information;
    }
}

/// Emitted when a polled phone's message-waiting indicator changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryEvent {
    pub host: String,
    pub information: DeviceInformation,
    pub state: AccessoryState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccessoryKind::ContactSensor, true, AccessoryState::ContactNotDetected)]
    #[case(AccessoryKind::ContactSensor, false, AccessoryState::ContactDetected)]
    #[case(AccessoryKind::Light, true, AccessoryState::LightOn)]
    #[case(AccessoryKind::Light, false, AccessoryState::LightOff)]
    fn test_state_mapping(
        #[case] kind: AccessoryKind,
        #[case] message_waiting: bool,
        #[case] expected: AccessoryState,
    ) {
        let state = AccessoryState::from_message_waiting(kind, message_waiting);
        assert_eq!(state, expected);
        assert_eq!(state.is_active(), message_waiting);
    }

    #[test]
    fn test_kind_from_device_type() {
        assert_eq!(AccessoryKind::from(DeviceType::Contact), AccessoryKind::ContactSensor);
        assert_eq!(AccessoryKind::from(DeviceType::Light), AccessoryKind::Light);
    }

    #[test]
    fn test_update_recomputes_state() {
        let mut accessory = Accessory::new("10.0.0.20", AccessoryKind::Light, DeviceInformation::default());
        assert_eq!(accessory.state, AccessoryState::LightOff);
        assert_eq!(accessory.name(), "10.0.0.20");

        accessory.update(DeviceInformation {
            host_name: "SEP0011".to_string(),
            message_waiting: Some("Yes".to_string()),
            ..DeviceInformation::default()
        });
        assert_eq!(accessory.state, AccessoryState::LightOn);
        assert_eq!(accessory.name(), "SEP0011");
    }
}
