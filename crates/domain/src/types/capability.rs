//! Capability tags and handle types

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named functional facet of a device.
///
/// Parsing is case-insensitive and tolerates a missing `st.` prefix; the
/// canonical camel-case tag is used when serializing. Tags this client does
/// not know are preserved verbatim in [`Capability::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    Switch,
    Lock,
    BatteryLevel,
    LockUser,
    DoorSensor,
    Brightness,
    Color,
    ColorTemperature,
    SwitchLevel,
    HealthCheck,
    Other(String),
}

impl Capability {
    /// Canonical wire tag, e.g. `st.batteryLevel`.
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Switch => "st.switch",
            Self::Lock => "st.lock",
            Self::BatteryLevel => "st.batteryLevel",
            Self::LockUser => "st.lockUser",
            Self::DoorSensor => "st.doorSensor",
            Self::Brightness => "st.brightness",
            Self::Color => "st.color",
            Self::ColorTemperature => "st.colorTemperature",
            Self::SwitchLevel => "st.switchLevel",
            Self::HealthCheck => "st.healthCheck",
            Self::Other(tag) => tag.as_str(),
        }
    }

    pub fn parse(tag: &str) -> Self {
        let trimmed = tag.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let bare = lowered.strip_prefix("st.").unwrap_or(&lowered);
        match bare {
            "switch" => Self::Switch,
            "lock" => Self::Lock,
            "batterylevel" => Self::BatteryLevel,
            "lockuser" => Self::LockUser,
            "doorsensor" => Self::DoorSensor,
            "brightness" => Self::Brightness,
            "color" => Self::Color,
            "colortemperature" => Self::ColorTemperature,
            "switchlevel" => Self::SwitchLevel,
            "healthcheck" => Self::HealthCheck,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Capability {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Capability {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Capability {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        match value {
            Capability::Other(tag) => tag,
            known => known.as_tag().to_string(),
        }
    }
}

/// Vendor-assigned identifier for a device model family (`utec-lock`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HandleType(String);

impl HandleType {
    pub const LOCK: &'static str = "utec-lock";
    pub const LOCK_SENSOR: &'static str = "utec-lock-sensor";
    pub const DIMMER: &'static str = "utec-dimmer";
    pub const LIGHT_RGBAW: &'static str = "utec-light-rgbaw-br";
    pub const BULB_RGBW: &'static str = "utec-bulb-color-rgbw";
    pub const SWITCH: &'static str = "utec-switch";

    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HandleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandleType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HandleType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<HandleType> for String {
    fn from(value: HandleType) -> Self {
        value.0
    }
}
