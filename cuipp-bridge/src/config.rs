//! Platform configuration
//!
//! The bridge reads the same JSON block a home-automation host keeps for the
//! platform: a `phones` array with one entry per handset.
//!
//! ```json
//! {
//!   "platform": "CiscoIPPhone",
//!   "phones": [
//!     {
//!       "IPAddress": "10.0.0.20",
//!       "DeviceType": "light",
//!       "PollingInterval": 30000,
//!       "Actions": [
//!         { "DeviceName": "Doorbell", "ExecItems": [{ "URL": "Play:Piano1.raw", "Priority": 0 }] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use cuipp_client::{ClientConfig, PhoneEndpoint, DEFAULT_PORT};
use cuipp_xml::{ExecuteItem, ExecutePriority};
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Polling interval used when a phone entry leaves `PollingInterval` unset
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 60_000;

/// Top-level platform block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub phones: Vec<PhoneConfiguration>,

    /// Read timeout for every phone exchange, in milliseconds
    #[serde(
        default,
        rename = "RequestTimeoutMs",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_timeout_ms: Option<u64>,
}

impl PlatformConfig {
    pub fn from_json_str(json: &str) -> BridgeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> BridgeResult<()> {
        let mut seen = HashSet::new();

        for phone in &self.phones {
            let address = phone.ip_address.trim();
            if address.is_empty() {
                return Err(BridgeError::Configuration(
                    "Phone entry without IPAddress".to_string(),
                ));
            }
            if !seen.insert(address.to_string()) {
                return Err(BridgeError::Configuration(format!(
                    "Phone {} is configured more than once",
                    address
                )));
            }
            for action in &phone.actions {
                action.execute_items()?;
            }
        }

        if self.request_timeout_ms == Some(0) {
            return Err(BridgeError::Configuration(
                "RequestTimeoutMs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(millis) = self.request_timeout_ms {
            config.read_timeout = Duration::from_millis(millis);
        }
        config
    }

    pub fn phone(&self, host: &str) -> Option<&PhoneConfiguration> {
        self.phones.iter().find(|p| p.ip_address.trim() == host)
    }
}

/// How a phone is exposed to the automation host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Contact,
    Light,
}

/// One handset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhoneConfiguration {
    #[serde(rename = "IPAddress")]
    pub ip_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,

    /// Milliseconds between polls; 0 turns polling off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_interval: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionConfiguration>,
}

impl PhoneConfiguration {
    pub fn new(ip_address: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            port: None,
            username: None,
            password: None,
            device_type: None,
            polling_interval: None,
            actions: Vec::new(),
        }
    }

    pub fn host(&self) -> &str {
        self.ip_address.trim()
    }

    pub fn endpoint(&self) -> PhoneEndpoint {
        let mut endpoint = PhoneEndpoint::new(self.host()).with_port(self.port.unwrap_or(DEFAULT_PORT));
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => endpoint = endpoint.with_credentials(user, pass),
            (Some(user), None) => endpoint = endpoint.with_username(user),
            _ => {}
        }
        endpoint
    }

    pub fn polling_interval(&self) -> u64 {
        self.polling_interval.unwrap_or(DEFAULT_POLLING_INTERVAL_MS)
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type.unwrap_or_default()
    }

    pub fn action(&self, name: &str) -> Option<&ActionConfiguration> {
        self.actions.iter().find(|a| a.device_name == name)
    }
}

/// A named set of execute commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionConfiguration {
    pub device_name: String,

    #[serde(default)]
    pub exec_items: Vec<ExecItemConfiguration>,
}

impl ActionConfiguration {
    pub fn execute_items(&self) -> BridgeResult<Vec<ExecuteItem>> {
        self.exec_items.iter().map(ExecItemConfiguration::to_execute_item).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecItemConfiguration {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Priority", default)]
    pub priority: PriorityValue,
}

impl ExecItemConfiguration {
    pub fn to_execute_item(&self) -> BridgeResult<ExecuteItem> {
        let priority = match &self.priority {
            PriorityValue::Code(code) => ExecutePriority::try_from(*code),
            PriorityValue::Text(text) => text.parse(),
        }
        .map_err(|e| BridgeError::Configuration(format!("{} for {}", e, self.url)))?;

        Ok(ExecuteItem::new(self.url.clone(), priority))
    }
}

/// `Priority` as written in JSON; hand-edited configs use both forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityValue {
    Code(u8),
    Text(String),
}

impl Default for PriorityValue {
    fn default() -> Self {
        Self::Code(ExecutePriority::Immediate.code())
    }
}
