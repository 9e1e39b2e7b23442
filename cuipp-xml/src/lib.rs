//! # cuipp-xml
//!
//! Typed model of the Cisco IP phone "XML services" documents and a
//! schema-agnostic parser for the XML the phones send back.
//!
//! ## Building a payload
//!
//! ```rust
//! use cuipp_xml::{MenuItem, Payload, XmlHeader};
//!
//! let menu = Payload::menu(
//!     XmlHeader::new().with_title("Home"),
//!     vec![MenuItem::new("Lights", "http://10.0.0.2/lights")],
//! );
//! let bytes = cuipp_xml::serialize(&menu);
//! assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>"));
//! ```
//!
//! ## Reading a reply
//!
//! ```rust
//! let snapshot = cuipp_xml::parse(
//!     b"<DeviceInformation><MessageWaiting>Yes</MessageWaiting></DeviceInformation>",
//! )?;
//! assert_eq!(snapshot.get("MessageWaiting"), Some("Yes"));
//! # Ok::<(), cuipp_xml::ParseError>(())
//! ```

pub mod error;
pub mod items;
pub mod payload;
pub mod response;
pub mod snapshot;
mod writer;

pub use error::{ParseError, ParseResult};
pub use items::{
    DirectoryItem, ExecutePriority, ExecuteItem, InputFlags, InputItem, InputKind, ItemError,
    MenuItem, SoftKeyItem,
};
pub use payload::{serialize, Payload, XmlHeader, DEFAULT_APP_ID};
pub use response::{parse, parse_elements, ResponseElement};
pub use snapshot::DeviceSnapshot;
