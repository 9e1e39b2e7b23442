//! PhonePlatform - one client and one poller shared by every configured phone

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cuipp_client::{PhoneClient, PhoneEndpoint, QueryPath};
use cuipp_poller::{DevicePoller, PollerStats, Registration, SnapshotSource, MESSAGE_WAITING_FIELD};
use cuipp_xml::{DeviceSnapshot, Payload};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::accessory::{Accessory, AccessoryEvent};
use crate::config::{PhoneConfiguration, PlatformConfig};
use crate::device_info::DeviceInformation;
use crate::error::{BridgeError, BridgeResult};

/// Receives every accessory state change
pub type StateCallback = Arc<dyn Fn(AccessoryEvent) + Send + Sync>;

struct PhoneEntry {
    config: PhoneConfiguration,
    endpoint: PhoneEndpoint,
    accessory: Accessory,
}

type PhoneMap = Arc<RwLock<HashMap<String, PhoneEntry>>>;

/// Bridges configured phones to accessories.
///
/// ```rust,no_run
/// use cuipp_bridge::{PhonePlatform, PlatformConfig};
///
/// # async fn run() -> Result<(), cuipp_bridge::BridgeError> {
/// let config = PlatformConfig::from_file("config.json")?;
/// let platform = PhonePlatform::new(config)?;
///
/// let accessories = platform
///     .start(|event| println!("{} is now {}", event.host, event.state))
///     .await;
///
/// for accessory in &accessories {
///     platform.run_action(&accessory.host, "Doorbell").await.ok();
/// }
/// # Ok(())
/// # }
/// ```
pub struct PhonePlatform {
    config: PlatformConfig,
    client: PhoneClient,
    source: Arc<dyn SnapshotSource>,
    poller: DevicePoller,
    phones: PhoneMap,
}

impl PhonePlatform {
    /// Must be called from within a tokio runtime.
    pub fn new(config: PlatformConfig) -> BridgeResult<Self> {
        let client = PhoneClient::with_config(config.client_config());
        let source: Arc<dyn SnapshotSource> = Arc::new(client.clone());
        Self::with_source(config, client, source)
    }

    /// Poll device information through `source` instead of the HTTP client
    pub fn with_source(
        config: PlatformConfig,
        client: PhoneClient,
        source: Arc<dyn SnapshotSource>,
    ) -> BridgeResult<Self> {
        config.validate()?;
        let poller = DevicePoller::new(Arc::clone(&source))?;

        Ok(Self {
            config,
            client,
            source,
            poller,
            phones: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Add every configured phone. Phones that cannot be reached are skipped.
    pub async fn start<F>(&self, on_state: F) -> Vec<Accessory>
    where
        F: Fn(AccessoryEvent) + Send + Sync + 'static,
    {
        let on_state: StateCallback = Arc::new(on_state);
        let mut added = Vec::new();

        for phone in &self.config.phones {
            let callback = Arc::clone(&on_state);
            match self.add_phone(phone.clone(), move |event| callback(event)).await {
                Ok(accessory) => added.push(accessory),
                Err(e) => warn!(phone = phone.host(), error = %e, "Skipping phone"),
            }
        }

        info!(
            added = added.len(),
            configured = self.config.phones.len(),
            "Platform started"
        );
        added
    }

    /// Read the phone's device information, expose it as an accessory and
    /// start watching its message-waiting indicator.
    pub async fn add_phone<F>(&self, phone: PhoneConfiguration, on_state: F) -> BridgeResult<Accessory>
    where
        F: Fn(AccessoryEvent) + Send + Sync + 'static,
    {
        let endpoint = phone.endpoint();
        let host = phone.host().to_string();

        debug!(phone = %endpoint, "Fetching device information");
        let snapshot = self.source.fetch(&endpoint).await?;

        let information = DeviceInformation::from_snapshot(&snapshot);
        let accessory = Accessory::new(host.clone(), phone.device_type().into(), information);
        info!(
            phone = %endpoint,
            name = accessory.name(),
            model = %accessory.information.model_number,
            state = %accessory.state,
            "Adding accessory"
        );

        let registration = Registration::new(endpoint.clone())
            .interval_ms(phone.polling_interval())
            .watch(MESSAGE_WAITING_FIELD)
            .initial_snapshot(snapshot);

        self.phones.write().insert(
            host.clone(),
            PhoneEntry {
                config: phone,
                endpoint,
                accessory: accessory.clone(),
            },
        );

        let phones = Arc::clone(&self.phones);
        let callback_host = host.clone();
        let registered = self.poller.register(registration, move |snapshot| {
            let information = DeviceInformation::from_snapshot(&snapshot);
            let event = {
                let mut phones = phones.write();
                let Some(entry) = phones.get_mut(&callback_host) else {
                    return;
                };
                entry.accessory.update(information);
                AccessoryEvent {
                    host: callback_host.clone(),
                    information: entry.accessory.information.clone(),
                    state: entry.accessory.state,
                }
            };

            info!(phone = %callback_host, state = %event.state, "MWI has changed, updating accessory");
            on_state(event);
        });

        if let Err(e) = registered {
            self.phones.write().remove(&host);
            return Err(e.into());
        }

        Ok(accessory)
    }

    /// Stop polling a phone and forget its accessory
    pub fn remove_phone(&self, host: &str) -> bool {
        let removed = self.phones.write().remove(host);
        match removed {
            Some(entry) => {
                self.poller.deregister(&entry.endpoint);
                info!(phone = %entry.endpoint, "Removed accessory");
                true
            }
            None => false,
        }
    }

    pub fn accessory(&self, host: &str) -> Option<Accessory> {
        self.phones.read().get(host).map(|entry| entry.accessory.clone())
    }

    pub fn accessories(&self) -> Vec<Accessory> {
        let mut accessories: Vec<Accessory> = self
            .phones
            .read()
            .values()
            .map(|entry| entry.accessory.clone())
            .collect();
        accessories.sort_by(|a, b| a.host.cmp(&b.host));
        accessories
    }

    /// Push the execute commands configured under `action` for `host`
    pub async fn run_action(&self, host: &str, action: &str) -> BridgeResult<u16> {
        let (endpoint, items) = {
            let phones = self.phones.read();
            let entry = phones
                .get(host)
                .ok_or_else(|| BridgeError::UnknownPhone(host.to_string()))?;
            let configured = entry.config.action(action).ok_or_else(|| BridgeError::UnknownAction {
                host: host.to_string(),
                action: action.to_string(),
            })?;
            (entry.endpoint.clone(), configured.execute_items()?)
        };

        info!(phone = %endpoint, action, commands = items.len(), "Running action");
        self.push_to(endpoint, Payload::execute(items)).await
    }

    pub async fn push(&self, host: &str, payload: Payload) -> BridgeResult<u16> {
        let endpoint = self.endpoint(host)?;
        self.push_to(endpoint, payload).await
    }

    pub async fn query(&self, host: &str, path: QueryPath) -> BridgeResult<DeviceSnapshot> {
        let endpoint = self.endpoint(host)?;
        let client = self.client.clone();

        let snapshot = tokio::task::spawn_blocking(move || client.query_path(&endpoint, path))
            .await
            .map_err(|e| BridgeError::Task(e.to_string()))??;
        Ok(snapshot)
    }

    pub fn poller_stats(&self) -> PollerStats {
        self.poller.stats()
    }

    /// Stop every polling session and drop all accessories
    pub fn shutdown(&self) {
        self.poller.shutdown_all();
        self.phones.write().clear();
        info!("Platform shut down");
    }

    fn endpoint(&self, host: &str) -> BridgeResult<PhoneEndpoint> {
        self.phones
            .read()
            .get(host)
            .map(|entry| entry.endpoint.clone())
            .ok_or_else(|| BridgeError::UnknownPhone(host.to_string()))
    }

    async fn push_to(&self, endpoint: PhoneEndpoint, payload: Payload) -> BridgeResult<u16> {
        let client = self.client.clone();

        let status = tokio::task::spawn_blocking(move || client.push(&endpoint, &payload))
            .await
            .map_err(|e| BridgeError::Task(e.to_string()))??;
        Ok(status)
    }
}

impl fmt::Debug for PhonePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhonePlatform")
            .field("configured", &self.config.phones.len())
            .field("registered", &self.phones.read().len())
            .finish()
    }
}
