//! Addressing and credentials for a single phone

use std::fmt;

use base64::Engine;

/// Port the phones serve their HTTP interface on
pub const DEFAULT_PORT: u16 = 80;

/// One physical phone.
///
/// Credentials are sent only when both the username and the password are set.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PhoneEndpoint {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
}

impl PhoneEndpoint {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Absolute URL for a path on this phone, e.g. `/DeviceInformationX`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }

    /// `Authorization` header value, if both credentials are present
    pub fn basic_auth(&self) -> Option<String> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                let token = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, pass));
                Some(format!("Basic {}", token))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PhoneEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for PhoneEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
