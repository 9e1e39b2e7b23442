//! Minimal document writer for phone payloads.
//!
//! The phones only accept single-byte ISO-8859-1 documents, so the writer
//! accumulates text and encodes it once at the end. Characters outside
//! Latin-1 become numeric character references.

use quick_xml::escape::escape;

pub(crate) const PROLOG: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>"#;

pub(crate) struct XmlWriter {
    buf: String,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self {
            buf: String::from(PROLOG),
        }
    }

    pub(crate) fn open(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.start_tag(name, attributes);
        self.buf.push('>');
    }

    pub(crate) fn close(&mut self, name: &str) {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
    }

    pub(crate) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.start_tag(name, attributes);
        self.buf.push_str("/>");
    }

    pub(crate) fn text_element(&mut self, name: &str, text: &str) {
        self.open(name, &[]);
        self.buf.push_str(&escape(text));
        self.close(name);
    }

    fn start_tag(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(name);
        for (key, value) in attributes {
            self.buf.push(' ');
            self.buf.push_str(key);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

/// Encode a document as ISO-8859-1.
pub(crate) fn encode_latin1(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(byte) => out.push(byte),
            Err(_) => out.extend_from_slice(format!("&#{};", u32::from(c)).as_bytes()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_escapes_text_and_attributes() {
        let mut writer = XmlWriter::new();
        writer.open("Root", &[("appId", "a\"b")]);
        writer.text_element("Text", "Tom & <Jerry>");
        writer.empty("Item", &[("URL", "Key:1&2")]);
        writer.close("Root");

        let xml = writer.into_string();
        assert_eq!(
            xml,
            format!(
                "{}<Root appId=\"a&quot;b\"><Text>Tom &amp; &lt;Jerry&gt;</Text><Item URL=\"Key:1&amp;2\"/></Root>",
                PROLOG
            )
        );
    }

    #[test]
    fn test_latin1_keeps_single_byte_characters() {
        assert_eq!(encode_latin1("Zürich"), vec![b'Z', 0xFC, b'r', b'i', b'c', b'h']);
    }

    #[test]
    fn test_latin1_references_wide_characters() {
        assert_eq!(encode_latin1("€5"), b"&#8364;5".to_vec());
    }
}
