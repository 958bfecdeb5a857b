//! Handle type to required capability mapping

use std::collections::{BTreeSet, HashMap};

use uhome_domain::{Capability, HandleType};

use super::DeviceKind;

/// Built-in handle types: variant and required capabilities.
pub const DEFAULT_HANDLE_TYPES: &[(&str, DeviceKind, &[Capability])] = &[
    (
        HandleType::LOCK,
        DeviceKind::Lock,
        &[Capability::Lock, Capability::BatteryLevel, Capability::LockUser],
    ),
    (
        HandleType::LOCK_SENSOR,
        DeviceKind::Lock,
        &[Capability::Lock, Capability::BatteryLevel, Capability::DoorSensor],
    ),
    (HandleType::DIMMER, DeviceKind::Light, &[Capability::Switch, Capability::Brightness]),
    (
        HandleType::LIGHT_RGBAW,
        DeviceKind::Light,
        &[
            Capability::Switch,
            Capability::Brightness,
            Capability::Color,
            Capability::ColorTemperature,
        ],
    ),
    (
        HandleType::BULB_RGBW,
        DeviceKind::Light,
        &[
            Capability::Switch,
            Capability::Brightness,
            Capability::Color,
            Capability::ColorTemperature,
        ],
    ),
    (HandleType::SWITCH, DeviceKind::Switch, &[Capability::Switch]),
];

/// Required capabilities per handle type.
///
/// Built once at startup and passed to the [`DeviceFactory`](super::DeviceFactory);
/// tests can hand in an alternate mapping.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: HashMap<HandleType, BTreeSet<Capability>>,
}

impl CapabilityRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with every built-in handle type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (handle_type, _, required) in DEFAULT_HANDLE_TYPES {
            registry.register(HandleType::new(handle_type), required.iter().cloned());
        }
        registry
    }

    /// Capabilities `handle_type` must expose; empty for unknown types.
    pub fn required_capabilities(&self, handle_type: &HandleType) -> BTreeSet<Capability> {
        self.entries.get(handle_type).cloned().unwrap_or_default()
    }

    /// Add or replace the entry for `handle_type`. Last writer wins.
    pub fn register(
        &mut self,
        handle_type: HandleType,
        required: impl IntoIterator<Item = Capability>,
    ) {
        self.entries.insert(handle_type, required.into_iter().collect());
    }

    pub fn contains(&self, handle_type: &HandleType) -> bool {
        self.entries.contains_key(handle_type)
    }

    pub fn handle_types(&self) -> impl Iterator<Item = &HandleType> {
        self.entries.keys()
    }
}
