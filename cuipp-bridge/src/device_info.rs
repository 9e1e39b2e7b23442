//! Identity fields read from `/DeviceInformationX`

use cuipp_xml::DeviceSnapshot;
use serde::{Deserialize, Serialize};

pub const MANUFACTURER: &str = "Cisco";

/// The subset of the device-information page the bridge exposes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInformation {
    #[serde(rename = "HostName")]
    pub host_name: String,
    #[serde(rename = "modelNumber")]
    pub model_number: String,
    #[serde(rename = "hardwareRevision")]
    pub hardware_revision: String,
    /// Software revision
    #[serde(rename = "versionID")]
    pub version_id: String,
    /// Firmware (boot loader) revision
    #[serde(rename = "bootLoadID")]
    pub boot_load_id: String,
    #[serde(rename = "serialNumber")]
    pub serial_number: String,
    #[serde(rename = "MessageWaiting", default, skip_serializing_if = "Option::is_none")]
    pub message_waiting: Option<String>,
}

impl DeviceInformation {
    /// Missing fields become empty strings.
    pub fn from_snapshot(snapshot: &DeviceSnapshot) -> Self {
        let field = |name: &str| snapshot.get(name).unwrap_or_default().to_string();

        Self {
            host_name: field("HostName"),
            model_number: field("modelNumber"),
            hardware_revision: field("hardwareRevision"),
            version_id: field("versionID"),
            boot_load_id: field("bootLoadID"),
            serial_number: field("serialNumber"),
            message_waiting: snapshot.get("MessageWaiting").map(str::to_owned),
        }
    }

    /// True only when the phone reports exactly `Yes`
    pub fn message_waiting(&self) -> bool {
        self.message_waiting.as_deref() == Some("Yes")
    }

    pub fn manufacturer(&self) -> &'static str {
        MANUFACTURER
    }

    /// Display name, falling back to `fallback` when the phone has no host name
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.host_name.is_empty() {
            fallback
        } else {
            &self.host_name
        }
    }
}
