//! Displayable and executable documents pushed to the phone
//!
//! Every document except `CiscoIPPhoneExecute` starts with the same header:
//! the `appId` attribute on the root, then optional `Title` and `Prompt`,
//! then one `SoftKeyItem` per soft key. The variant body follows the header.

use crate::items::{DirectoryItem, ExecuteItem, InputItem, MenuItem, SoftKeyItem};
use crate::writer::{encode_latin1, XmlWriter};

/// `appId` used when the caller does not supply one
pub const DEFAULT_APP_ID: &str = "CiscoIPPhone";

/// Fields shared by every document that has a header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlHeader {
    pub app_id: Option<String>,
    pub title: Option<String>,
    pub prompt: Option<String>,
    pub softkeys: Vec<SoftKeyItem>,
}

impl XmlHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_softkey(mut self, softkey: SoftKeyItem) -> Self {
        self.softkeys.push(softkey);
        self
    }

    /// The `appId` written on the root element. Empty values fall back to the default.
    pub fn app_id(&self) -> &str {
        self.app_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_APP_ID)
    }

    fn write_open(&self, writer: &mut XmlWriter, root: &str) {
        writer.open(root, &[("appId", self.app_id())]);

        if let Some(title) = non_empty(&self.title) {
            writer.text_element("Title", title);
        }
        if let Some(prompt) = non_empty(&self.prompt) {
            writer.text_element("Prompt", prompt);
        }

        for key in &self.softkeys {
            writer.open("SoftKeyItem", &[]);
            writer.text_element("Name", &key.name);
            writer.text_element("URL", &key.url);
            if let Some(url_down) = non_empty(&key.url_down) {
                writer.text_element("URLDown", url_down);
            }
            writer.text_element("Position", &key.position.to_string());
            writer.close("SoftKeyItem");
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A document the phone can display or execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Menu {
        header: XmlHeader,
        items: Vec<MenuItem>,
    },
    Text {
        header: XmlHeader,
        body: String,
    },
    Input {
        header: XmlHeader,
        /// URL the phone submits the form to
        url: String,
        items: Vec<InputItem>,
    },
    Directory {
        header: XmlHeader,
        entries: Vec<DirectoryItem>,
    },
    Execute {
        commands: Vec<ExecuteItem>,
    },
}

impl Payload {
    pub fn menu(header: XmlHeader, items: Vec<MenuItem>) -> Self {
        Self::Menu { header, items }
    }

    pub fn text(header: XmlHeader, body: impl Into<String>) -> Self {
        Self::Text {
            header,
            body: body.into(),
        }
    }

    pub fn input(header: XmlHeader, url: impl Into<String>, items: Vec<InputItem>) -> Self {
        Self::Input {
            header,
            url: url.into(),
            items,
        }
    }

    pub fn directory(header: XmlHeader, entries: Vec<DirectoryItem>) -> Self {
        Self::Directory { header, entries }
    }

    pub fn execute(commands: Vec<ExecuteItem>) -> Self {
        Self::Execute { commands }
    }

    /// Name of the document's root element
    pub fn root_name(&self) -> &'static str {
        match self {
            Self::Menu { .. } => "CiscoIPPhoneMenu",
            Self::Text { .. } => "CiscoIPPhoneText",
            Self::Input { .. } => "CiscoIPPhoneInput",
            Self::Directory { .. } => "CiscoIPPhoneDirectory",
            Self::Execute { .. } => "CiscoIPPhoneExecute",
        }
    }

    /// The shared header, `None` for execute documents
    pub fn header(&self) -> Option<&XmlHeader> {
        match self {
            Self::Menu { header, .. }
            | Self::Text { header, .. }
            | Self::Input { header, .. }
            | Self::Directory { header, .. } => Some(header),
            Self::Execute { .. } => None,
        }
    }

    /// Render the document as text, prolog included.
    ///
    /// Use [`Payload::to_bytes`] for what goes on the wire.
    pub fn to_xml_string(&self) -> String {
        let mut writer = XmlWriter::new();
        let root = self.root_name();

        match self {
            Self::Menu { header, items } => {
                header.write_open(&mut writer, root);
                for item in items {
                    writer.open("MenuItem", &[]);
                    writer.text_element("Name", &item.name);
                    writer.text_element("URL", &item.url);
                    writer.close("MenuItem");
                }
            }
            Self::Text { header, body } => {
                header.write_open(&mut writer, root);
                writer.text_element("Text", body);
            }
            Self::Input { header, url, items } => {
                header.write_open(&mut writer, root);
                for item in items {
                    writer.open("InputItem", &[]);
                    writer.text_element("DisplayName", &item.name);
                    writer.text_element("QueryStringParam", &item.param);
                    writer.text_element("InputFlags", &item.flags.to_string());
                    writer.close("InputItem");
                }
                writer.text_element("URL", url);
            }
            Self::Directory { header, entries } => {
                header.write_open(&mut writer, root);
                for entry in entries {
                    writer.open("DirectoryEntry", &[]);
                    writer.text_element("Name", &entry.name);
                    writer.text_element("Telephone", &entry.phone);
                    writer.close("DirectoryEntry");
                }
            }
            Self::Execute { commands } => {
                writer.open(root, &[]);
                for command in commands {
                    let priority = command.priority.to_string();
                    writer.empty(
                        "ExecuteItem",
                        &[("URL", command.url.as_str()), ("Priority", priority.as_str())],
                    );
                }
            }
        }

        writer.close(root);
        writer.into_string()
    }

    /// ISO-8859-1 bytes as the phone expects them
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_latin1(&self.to_xml_string())
    }
}

/// Serialize a payload to its wire bytes.
pub fn serialize(payload: &Payload) -> Vec<u8> {
    payload.to_bytes()
}
