//! Reported device state
//!
//! Query and command responses carry `payload.devices[].states[]`, each
//! entry naming a capability, an attribute and a value. [`DeviceStates`]
//! folds those entries into a `capability -> attribute -> value` map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_state_conversions;
use crate::types::Capability;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub capability: Capability,
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStateReport {
    pub id: String,
    #[serde(default)]
    pub states: Vec<StateEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatesPayload {
    #[serde(default)]
    pub devices: Vec<DeviceStateReport>,
}

/// Snapshot of the attributes most recently reported for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStates(BTreeMap<Capability, BTreeMap<String, Value>>);

impl DeviceStates {
    pub fn from_entries(entries: impl IntoIterator<Item = StateEntry>) -> Self {
        let mut map: BTreeMap<Capability, BTreeMap<String, Value>> = BTreeMap::new();
        for entry in entries {
            map.entry(entry.capability).or_default().insert(entry.name, entry.value);
        }
        Self(map)
    }

    pub fn get(&self, capability: &Capability, attribute: &str) -> Option<&Value> {
        self.0.get(capability).and_then(|attrs| attrs.get(attribute))
    }

    /// First attribute present among `attributes`, for values the vendor
    /// reports under more than one name.
    pub fn get_any(&self, capability: &Capability, attributes: &[&str]) -> Option<&Value> {
        attributes.iter().find_map(|name| self.get(capability, name))
    }

    pub fn capability(&self, capability: &Capability) -> Option<&BTreeMap<String, Value>> {
        self.0.get(capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Locked,
    Unlocked,
    Jammed,
    Unknown,
}

impl_state_conversions!(LockState {
    Locked => "locked" | 1,
    Unlocked => "unlocked" | 2,
    Jammed => "jammed" | 3,
    Unknown => "unknown" | 4,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Closed,
    Open,
    Unknown,
}

impl_state_conversions!(DoorState {
    Closed => "closed" | 1,
    Open => "open" | 2,
    Unknown => "unknown" | 3,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl_state_conversions!(PowerState {
    On => "on" | 1,
    Off => "off" | 2,
});

/// Qualitative battery level reported as an ordinal 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryLevel {
    CriticallyLow,
    Low,
    Medium,
    High,
    Full,
}

impl_state_conversions!(BatteryLevel {
    CriticallyLow => "critically low" | 1,
    Low => "low" | 2,
    Medium => "medium" | 3,
    High => "high" | 4,
    Full => "full" | 5,
});
