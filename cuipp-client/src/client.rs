//! Blocking HTTP exchanges with a phone

use std::io::{self, Read};
use std::time::Duration;

use cuipp_xml::{DeviceSnapshot, Payload, ResponseElement};
use tracing::{debug, info, warn};

use crate::endpoint::PhoneEndpoint;
use crate::error::{Result, TransportError};

/// Path the phone accepts pushed documents on
pub const EXECUTE_PATH: &str = "/CGI/Execute";

/// Content type the phones require on pushed documents. The `charset:`
/// spelling is what the firmware expects.
pub const EXECUTE_CONTENT_TYPE: &str = "text/xml; charset:ISO-8859-1";

/// Largest reply body read from a phone
pub const MAX_REPLY_BYTES: u64 = 1024 * 1024;

/// Telemetry pages served by the phone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryPath {
    /// Identity, firmware revisions and the message-waiting indicator
    DeviceInformation,
    NetworkConfiguration,
    /// Call and RTP stream status of the first stream
    StreamingStatistics,
}

impl QueryPath {
    pub const fn path(self) -> &'static str {
        match self {
            Self::DeviceInformation => "/DeviceInformationX",
            Self::NetworkConfiguration => "/NetworkConfigurationX",
            Self::StreamingStatistics => "/StreamingStatisticsX?n1",
        }
    }
}

/// Timeouts applied to every exchange
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Default: 5 seconds
    pub connect_timeout: Duration,
    /// Default: 10 seconds
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
        }
    }
}

/// Outcome of a successful push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReply {
    pub status: u16,
    /// Top-level elements of the phone's reply; empty if it could not be parsed
    pub elements: Vec<ResponseElement>,
}

/// HTTP client for phone XML services.
///
/// Each call is a single request/response exchange with no retries. The
/// underlying agent may reuse connections between calls.
#[derive(Debug, Clone)]
pub struct PhoneClient {
    agent: ureq::Agent,
}

impl PhoneClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(config.connect_timeout)
                .timeout_read(config.read_timeout)
                .build(),
        }
    }

    /// Push a document to the phone and return the HTTP status code.
    ///
    /// The phone's reply is logged element by element.
    pub fn push(&self, endpoint: &PhoneEndpoint, payload: &Payload) -> Result<u16> {
        self.push_with_reply(endpoint, payload).map(|reply| reply.status)
    }

    /// Push a document and keep the phone's reply elements.
    pub fn push_with_reply(&self, endpoint: &PhoneEndpoint, payload: &Payload) -> Result<PushReply> {
        let xml = payload.to_bytes();
        debug!(phone = %endpoint, document = %payload.to_xml_string(), "Posting payload");

        let request = self
            .agent
            .post(&endpoint.url(EXECUTE_PATH))
            .set("Content-Type", EXECUTE_CONTENT_TYPE);

        let response = authorize(request, endpoint)
            .send_bytes(form_body(&xml).as_bytes())
            .map_err(|e| log_failure(endpoint, EXECUTE_PATH, transport_error(e)))?;

        let status = response.status();
        ensure_success(status)?;
        let body = read_body(response)?;

        let elements = match cuipp_xml::parse_elements(&body) {
            Ok(elements) => {
                for element in &elements {
                    info!(phone = %endpoint, "{}", element);
                }
                elements
            }
            Err(e) => {
                warn!(phone = %endpoint, error = %e, "Phone reply was not XML");
                Vec::new()
            }
        };

        Ok(PushReply { status, elements })
    }

    /// GET a telemetry page and flatten it into a snapshot.
    pub fn query(&self, endpoint: &PhoneEndpoint, path: &str) -> Result<DeviceSnapshot> {
        let request = authorize(self.agent.get(&endpoint.url(path)), endpoint);

        let response = request
            .call()
            .map_err(|e| log_failure(endpoint, path, transport_error(e)))?;

        ensure_success(response.status())?;
        let body = read_body(response)?;
        debug!(phone = %endpoint, path, raw = %String::from_utf8_lossy(&body), "Raw response");

        Ok(cuipp_xml::parse(&body)?)
    }

    pub fn query_path(&self, endpoint: &PhoneEndpoint, path: QueryPath) -> Result<DeviceSnapshot> {
        self.query(endpoint, path.path())
    }

    pub fn device_information(&self, endpoint: &PhoneEndpoint) -> Result<DeviceSnapshot> {
        self.query_path(endpoint, QueryPath::DeviceInformation)
    }

    pub fn network_configuration(&self, endpoint: &PhoneEndpoint) -> Result<DeviceSnapshot> {
        self.query_path(endpoint, QueryPath::NetworkConfiguration)
    }

    pub fn streaming_statistics(&self, endpoint: &PhoneEndpoint) -> Result<DeviceSnapshot> {
        self.query_path(endpoint, QueryPath::StreamingStatistics)
    }
}

impl Default for PhoneClient {
    fn default() -> Self {
        Self::new()
    }
}

fn authorize(request: ureq::Request, endpoint: &PhoneEndpoint) -> ureq::Request {
    match endpoint.basic_auth() {
        Some(auth) => request.set("Authorization", &auth),
        None => request,
    }
}

/// `XML=<percent-encoded document>`
fn form_body(xml: &[u8]) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(xml).collect();
    format!("XML={}", encoded)
}

fn ensure_success(status: u16) -> std::result::Result<(), TransportError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(TransportError::Status(status))
    }
}

fn read_body(response: ureq::Response) -> std::result::Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_REPLY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| TransportError::Network(e.to_string()))?;

    if body.len() as u64 > MAX_REPLY_BYTES {
        return Err(TransportError::ReplyTooLarge(MAX_REPLY_BYTES));
    }
    Ok(body)
}

fn transport_error(error: ureq::Error) -> TransportError {
    match error {
        ureq::Error::Status(401 | 403, _) => TransportError::Unauthorized,
        ureq::Error::Status(code, _) => TransportError::Status(code),
        ureq::Error::Transport(transport) => {
            if is_timeout(&transport) {
                TransportError::Timeout(transport.to_string())
            } else {
                TransportError::Network(transport.to_string())
            }
        }
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .map_or(false, |e| {
            matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
        })
}

fn log_failure(endpoint: &PhoneEndpoint, path: &str, error: TransportError) -> TransportError {
    warn!(phone = %endpoint, path, error = %error, "Phone request failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let _client = PhoneClient::new();
        let _default_client = PhoneClient::default();
        let _custom = PhoneClient::with_config(ClientConfig {
            connect_timeout: Duration::from_millis(250),
            read_timeout: Duration::from_secs(1),
        });
    }

    #[test]
    fn test_query_paths() {
        assert_eq!(QueryPath::DeviceInformation.path(), "/DeviceInformationX");
        assert_eq!(QueryPath::NetworkConfiguration.path(), "/NetworkConfigurationX");
        assert_eq!(QueryPath::StreamingStatistics.path(), "/StreamingStatisticsX?n1");
    }

    #[test]
    fn test_form_body_percent_encodes_document() {
        assert_eq!(form_body(b"<a b=\"1\">x y</a>"), "XML=%3Ca+b%3D%221%22%3Ex+y%3C%2Fa%3E");
    }

    #[test]
    fn test_form_body_encodes_latin1_bytes() {
        assert_eq!(form_body(&[b'C', 0xE9]), "XML=C%E9");
    }

    #[test]
    fn test_ensure_success() {
        assert!(ensure_success(200).is_ok());
        assert!(ensure_success(204).is_ok());
        assert!(matches!(ensure_success(302), Err(TransportError::Status(302))));
    }
}
