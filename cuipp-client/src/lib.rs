//! HTTP transport for Cisco IP phone XML services
//!
//! This crate pushes [`cuipp_xml::Payload`] documents to a phone's
//! `/CGI/Execute` handler and reads the phone's XML telemetry pages into
//! [`cuipp_xml::DeviceSnapshot`]s. Requests carry HTTP Basic credentials
//! when the endpoint has both a username and a password.
//!
//! ```rust,no_run
//! use cuipp_client::{PhoneClient, PhoneEndpoint};
//! use cuipp_xml::{ExecuteItem, Payload};
//!
//! let client = PhoneClient::new();
//! let phone = PhoneEndpoint::new("192.168.1.50").with_credentials("bridge", "secret");
//!
//! let status = client.push(&phone, &Payload::execute(vec![ExecuteItem::immediate("Play:Piano1.raw")]))?;
//! let info = client.device_information(&phone)?;
//! println!("{} -> MWI {:?}", status, info.get("MessageWaiting"));
//! # Ok::<(), cuipp_client::PhoneError>(())
//! ```

mod client;
mod endpoint;
mod error;

pub use client::{
    ClientConfig, PhoneClient, PushReply, QueryPath, EXECUTE_CONTENT_TYPE, EXECUTE_PATH,
    MAX_REPLY_BYTES,
};
pub use endpoint::{PhoneEndpoint, DEFAULT_PORT};
pub use error::{PhoneError, Result, TransportError};
