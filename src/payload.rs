//! WiFi-QR payload encoding.
//!
//! Builds the `WIFI:T:<security>;S:<ssid>;P:<password>;;` string understood by
//! phone camera apps, and parses it back.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Characters that must be preceded by a backslash inside a field.
const SPECIAL_CHARS: &[char] = &['\\', ';', ':', ',', '"'];

const PREFIX: &str = "WIFI:";
const TERMINATOR: &str = ";;";

/// Network authentication type written into the `T:` field.
///
/// Unrecognized values are kept verbatim; the encoder does not validate them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Security {
    #[default]
    Wpa,
    Wep,
    NoPass,
    Other(String),
}

impl Security {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wpa => "WPA",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
            Self::Other(raw) => raw,
        }
    }
}

impl FromStr for Security {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "WPA" => Self::Wpa,
            "WEP" => Self::Wep,
            "nopass" => Self::NoPass,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for Security {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(security) => security,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Security {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Security {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Security::from(raw.as_str()))
    }
}

/// Raw network credentials as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredential {
    pub ssid: String,
    pub password: String,
    pub security: Security,
}

impl WifiCredential {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>, security: Security) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
            security,
        }
    }

    pub fn to_payload(&self) -> WifiPayload {
        encode(&self.ssid, &self.password, &self.security)
    }
}

/// Encoded payload text. Built per request and discarded after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiPayload(String);

impl WifiPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Parse a payload back into its credential.
    ///
    /// Fields may appear in any order. A missing `T:` yields [`Security::NoPass`]
    /// and a missing `P:` an empty password; `S:` is required.
    pub fn parse(text: &str) -> Result<WifiCredential> {
        let body = text
            .trim()
            .strip_prefix(PREFIX)
            .ok_or_else(|| Error::Payload(format!("missing {PREFIX} prefix")))?;
        let body = body
            .strip_suffix(TERMINATOR)
            .ok_or_else(|| Error::Payload(format!("missing {TERMINATOR} terminator")))?;

        let mut ssid = None;
        let mut password = None;
        let mut security = None;
        for field in split_fields(body) {
            let (key, value) = field
                .split_once(':')
                .ok_or_else(|| Error::Payload(format!("field without key: {field:?}")))?;
            let value = unescape(value);
            match key {
                "S" => ssid = Some(value),
                "P" => password = Some(value),
                "T" => security = Some(Security::from(value.as_str())),
                // H: (hidden) and vendor extensions are accepted and ignored.
                _ => {}
            }
        }

        Ok(WifiCredential {
            ssid: ssid.ok_or_else(|| Error::Payload("missing S: field".to_string()))?,
            password: password.unwrap_or_default(),
            security: security.unwrap_or(Security::NoPass),
        })
    }
}

impl fmt::Display for WifiPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the payload string. Pure; the security value is written verbatim.
pub fn encode(ssid: &str, password: &str, security: &Security) -> WifiPayload {
    WifiPayload(format!(
        "{PREFIX}T:{security};S:{};P:{}{TERMINATOR}",
        escape(ssid),
        escape(password)
    ))
}

/// Backslash-escape `\ ; : , "` in a single pass.
pub fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if SPECIAL_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reverse of [`escape`]. A trailing lone backslash is kept as-is.
pub fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split on unescaped `;`, leaving escapes in place for [`unescape`].
fn split_fields(body: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ';' => {
                fields.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if start < body.len() {
        fields.push(&body[start..]);
    }
    fields.retain(|field| !field.is_empty());
    fields
}
