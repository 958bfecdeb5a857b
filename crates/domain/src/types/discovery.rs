//! Discovery records as returned by the `Uhome.Device/Discovery` call

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Capability, HandleType};

/// One device as described by the vendor's discovery response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub handle_type: Option<HandleType>,
    /// Vendor category string such as `LOCK`, `LIGHT`, `SWITCH` or `PLUG`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "capabilities")]
    pub supported_capabilities: BTreeSet<Capability>,
    #[serde(default)]
    pub device_info: DeviceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
    #[serde(default)]
    pub attributes: DeviceAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub hw_version: Option<String>,
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceAttributes {
    pub color_temperature_range: Option<ColorTemperatureRange>,
    pub switch_type: Option<String>,
    pub color_model: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Supported color temperature in Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTemperatureRange {
    pub min: u32,
    pub max: u32,
    #[serde(default)]
    pub step: Option<u32>,
}

impl ColorTemperatureRange {
    pub const fn contains(&self, kelvin: u32) -> bool {
        kelvin >= self.min && kelvin <= self.max
    }
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryPayload {
    #[serde(default)]
    pub devices: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Lock,
    Light,
    Switch,
    Plug,
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lock => "lock",
            Self::Light => "light",
            Self::Switch => "switch",
            Self::Plug => "plug",
        })
    }
}
