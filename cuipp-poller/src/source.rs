//! Where a polling tick gets its snapshot from

use async_trait::async_trait;
use cuipp_client::{PhoneClient, PhoneEndpoint, PhoneError, TransportError};
use cuipp_xml::DeviceSnapshot;

/// Fetches the telemetry snapshot a tick compares against.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, endpoint: &PhoneEndpoint) -> Result<DeviceSnapshot, PhoneError>;
}

/// Reads `/DeviceInformationX` on tokio's blocking pool so a slow phone
/// never stalls the runtime.
#[async_trait]
impl SnapshotSource for PhoneClient {
    async fn fetch(&self, endpoint: &PhoneEndpoint) -> Result<DeviceSnapshot, PhoneError> {
        let client = self.clone();
        let endpoint = endpoint.clone();

        tokio::task::spawn_blocking(move || client.device_information(&endpoint))
            .await
            .map_err(|e| TransportError::Network(format!("Polling exchange did not complete: {}", e)))?
    }
}
