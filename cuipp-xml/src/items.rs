//! Value types carried inside phone payloads
//!
//! These are plain data. Serialization lives in [`crate::payload`]; the
//! types here only know their own wire codes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when reading an item code from text (e.g. configuration)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// Input field-type code was not one of A, T, N, E, U, L (optionally followed by P)
    #[error("Invalid input flags: {0:?}")]
    InvalidInputFlags(String),

    /// Execute priority was not 0, 1 or 2
    #[error("Invalid execute priority: {0:?}")]
    InvalidPriority(String),
}

/// A soft key shown along the bottom of the phone display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftKeyItem {
    pub name: String,
    pub url: String,
    /// URL requested when the key is released; omitted from the document when unset
    pub url_down: Option<String>,
    pub position: u8,
}

impl SoftKeyItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>, position: u8) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            url_down: None,
            position,
        }
    }

    pub fn with_url_down(mut self, url_down: impl Into<String>) -> Self {
        self.url_down = Some(url_down.into());
        self
    }
}

/// One selectable line of a `CiscoIPPhoneMenu`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub url: String,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Kind of value an input field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Ascii,
    Telephone,
    Numeric,
    Expression,
    Uppercase,
    Lowercase,
}

impl InputKind {
    pub const fn code(self) -> char {
        match self {
            Self::Ascii => 'A',
            Self::Telephone => 'T',
            Self::Numeric => 'N',
            Self::Expression => 'E',
            Self::Uppercase => 'U',
            Self::Lowercase => 'L',
        }
    }

    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Self::Ascii),
            'T' => Some(Self::Telephone),
            'N' => Some(Self::Numeric),
            'E' => Some(Self::Expression),
            'U' => Some(Self::Uppercase),
            'L' => Some(Self::Lowercase),
            _ => None,
        }
    }
}

/// Field-type code written into `InputFlags`
///
/// A password field is masked on the handset and carries a trailing `P`
/// after the kind code (`"AP"`, `"NP"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputFlags {
    pub kind: InputKind,
    pub password: bool,
}

impl InputFlags {
    pub const fn new(kind: InputKind) -> Self {
        Self {
            kind,
            password: false,
        }
    }

    pub const fn password(kind: InputKind) -> Self {
        Self {
            kind,
            password: true,
        }
    }
}

impl From<InputKind> for InputFlags {
    fn from(kind: InputKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for InputFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.code())?;
        if self.password {
            write!(f, "P")?;
        }
        Ok(())
    }
}

impl FromStr for InputFlags {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ItemError::InvalidInputFlags(s.to_string());
        let mut chars = s.trim().chars();

        let kind = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .and_then(InputKind::from_code)
            .ok_or_else(invalid)?;

        let password = match chars.next() {
            None => false,
            Some('P') | Some('p') => true,
            Some(_) => return Err(invalid()),
        };

        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { kind, password })
    }
}

/// One field of a `CiscoIPPhoneInput` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    /// Label shown next to the field
    pub name: String,
    /// Query string parameter the value is submitted as
    pub param: String,
    pub flags: InputFlags,
}

impl InputItem {
    pub fn new(name: impl Into<String>, param: impl Into<String>, flags: impl Into<InputFlags>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
            flags: flags.into(),
        }
    }
}

/// One entry of a `CiscoIPPhoneDirectory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryItem {
    pub name: String,
    pub phone: String,
}

impl DirectoryItem {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// When the phone should run an execute command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutePriority {
    /// Run immediately
    #[default]
    Immediate,
    /// Queue until the phone is idle
    WhenIdle,
    /// Run only if the phone is already idle
    OnlyIfIdle,
}

impl ExecutePriority {
    pub const fn code(self) -> u8 {
        match self {
            Self::Immediate => 0,
            Self::WhenIdle => 1,
            Self::OnlyIfIdle => 2,
        }
    }
}

impl TryFrom<u8> for ExecutePriority {
    type Error = ItemError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Immediate),
            1 => Ok(Self::WhenIdle),
            2 => Ok(Self::OnlyIfIdle),
            other => Err(ItemError::InvalidPriority(other.to_string())),
        }
    }
}

impl FromStr for ExecutePriority {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| ItemError::InvalidPriority(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for ExecutePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One command of a `CiscoIPPhoneExecute` document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteItem {
    /// URI the phone executes, e.g. `Play:Piano1.raw` or `Key:Services`
    pub url: String,
    pub priority: ExecutePriority,
}

impl ExecuteItem {
    pub fn new(url: impl Into<String>, priority: ExecutePriority) -> Self {
        Self {
            url: url.into(),
            priority,
        }
    }

    pub fn immediate(url: impl Into<String>) -> Self {
        Self::new(url, ExecutePriority::Immediate)
    }
}
