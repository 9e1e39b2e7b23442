//! Schema-agnostic decoding of phone replies
//!
//! The telemetry pages (`DeviceInformationX`, `NetworkConfigurationX`,
//! `StreamingStatisticsX`) each return a different, undocumented field set
//! under a single root. Only the root's direct children are read.

use std::fmt;

use xmltree::{Element, XMLNode};

use crate::error::{ParseError, ParseResult};
use crate::snapshot::DeviceSnapshot;

/// One direct child of a reply's root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseElement {
    /// Local name, without namespace prefix
    pub name: String,
    /// Concatenated text of the element and all of its descendants
    pub text: String,
    /// Attributes sorted by name
    pub attributes: Vec<(String, String)>,
}

impl fmt::Display for ResponseElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }
        if !self.text.is_empty() {
            write!(f, ": {}", self.text)?;
        }
        Ok(())
    }
}

/// Decode a reply into its top-level elements, in document order.
pub fn parse_elements(xml: &[u8]) -> ParseResult<Vec<ResponseElement>> {
    if xml.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::EmptyDocument);
    }

    let root = Element::parse(xml).map_err(|e| ParseError::MalformedXml(e.to_string()))?;

    Ok(root
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .map(|child| {
            let mut attributes: Vec<(String, String)> = child
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            attributes.sort();

            ResponseElement {
                name: child.name.clone(),
                text: text_content(child),
                attributes,
            }
        })
        .collect())
}

/// Decode a reply into a flat snapshot.
///
/// When a field name repeats, the later occurrence wins.
pub fn parse(xml: &[u8]) -> ParseResult<DeviceSnapshot> {
    Ok(parse_elements(xml)?
        .into_iter()
        .map(|element| (element.name, element.text))
        .collect())
}

fn text_content(element: &Element) -> String {
    let mut text = String::new();
    collect_text(element, &mut text);
    text
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            XMLNode::Text(t) | XMLNode::CData(t) => out.push_str(t),
            XMLNode::Element(child) => collect_text(child, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_INFO: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<DeviceInformation><MACAddress>001122334455</MACAddress><HostName>SEP001122334455</HostName><phoneDN>1001</phoneDN><MessageWaiting>No</MessageWaiting></DeviceInformation>"#;

    #[test]
    fn test_parse_device_information() {
        let snapshot = parse(DEVICE_INFO.as_bytes()).unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.get("HostName"), Some("SEP001122334455"));
        assert_eq!(snapshot.get("phoneDN"), Some("1001"));
        assert_eq!(snapshot.get("MessageWaiting"), Some("No"));
    }

    #[test]
    fn test_duplicate_names_keep_last_value() {
        let snapshot =
            parse(b"<Stats><Name>first</Name><Other>x</Other><Name>second</Name></Stats>").unwrap();
        assert_eq!(snapshot.get("Name"), Some("second"));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_nested_children_flatten_to_text() {
        let snapshot = parse(b"<Net><DNS><A>10.0.0.1</A><B>10.0.0.2</B></DNS></Net>").unwrap();
        assert_eq!(snapshot.get("DNS"), Some("10.0.0.110.0.0.2"));
        assert!(!snapshot.contains("A"));
    }

    #[test]
    fn test_empty_element_has_empty_text() {
        let snapshot = parse(b"<Info><Empty/></Info>").unwrap();
        assert_eq!(snapshot.get("Empty"), Some(""));
    }

    #[test]
    fn test_namespace_prefix_is_dropped() {
        let snapshot = parse(br#"<r xmlns:p="urn:x"><p:Field>v</p:Field></r>"#).unwrap();
        assert_eq!(snapshot.get("Field"), Some("v"));
    }

    #[test]
    fn test_parse_elements_keeps_attributes() {
        let elements = parse_elements(
            br#"<CiscoIPPhoneResponse><ResponseItem URL="Play:Piano1.raw" Data="Success" Status="0"/></CiscoIPPhoneResponse>"#,
        )
        .unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(
            elements[0].to_string(),
            r#"ResponseItem Data="Success" Status="0" URL="Play:Piano1.raw""#
        );
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse(b"<DeviceInformation><HostName>SEP</DeviceInformation>");
        assert!(matches!(result, Err(ParseError::MalformedXml(_))));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse(b"  \n"), Err(ParseError::EmptyDocument));
    }
}
