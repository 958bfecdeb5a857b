//! Smart switches and plugs

use std::ops::Deref;

use uhome_domain::{Capability, DeviceCategory, DiscoveryRecord, PowerState, Result};

use super::DeviceCore;

#[derive(Debug)]
pub struct Switch {
    core: DeviceCore,
}

impl Switch {
    pub(crate) fn new(core: DeviceCore) -> Self {
        Self { core }
    }

    /// Switch or plug, decided by the discovery `category` and then by the
    /// `switchType` attribute. Defaults to a switch.
    pub(crate) fn category_for(record: &DiscoveryRecord) -> DeviceCategory {
        let hints = [record.category.as_deref(), record.attributes.switch_type.as_deref()];
        hints
            .into_iter()
            .flatten()
            .find_map(|hint| {
                let hint = hint.to_ascii_lowercase();
                if hint.contains("plug") || hint.contains("outlet") {
                    Some(DeviceCategory::Plug)
                } else if hint.contains("switch") {
                    Some(DeviceCategory::Switch)
                } else {
                    None
                }
            })
            .unwrap_or(DeviceCategory::Switch)
    }

    pub fn core(&self) -> &DeviceCore {
        &self.core
    }

    pub async fn turn_on(&self) -> Result<()> {
        self.core.send(Capability::Switch, "on", None).await
    }

    pub async fn turn_off(&self) -> Result<()> {
        self.core.send(Capability::Switch, "off", None).await
    }

    pub fn power_state(&self) -> Option<PowerState> {
        self.core
            .state_value(&Capability::Switch, &["switch"])
            .and_then(|value| PowerState::from_value(&value))
    }

    pub fn is_on(&self) -> bool {
        self.power_state() == Some(PowerState::On)
    }
}

impl Deref for Switch {
    type Target = DeviceCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(category: Option<&str>, switch_type: Option<&str>) -> DiscoveryRecord {
        let mut value = json!({"id": "sw-1", "handleType": "utec-switch"});
        if let Some(category) = category {
            value["category"] = json!(category);
        }
        if let Some(switch_type) = switch_type {
            value["attributes"] = json!({"switchType": switch_type});
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn category_follows_discovery_category() {
        assert_eq!(Switch::category_for(&record(Some("SmartPlug"), None)), DeviceCategory::Plug);
        assert_eq!(Switch::category_for(&record(Some("switch"), None)), DeviceCategory::Switch);
    }

    #[test]
    fn category_falls_back_to_switch_type() {
        let plug = record(Some("other"), Some("plug"));
        assert_eq!(Switch::category_for(&plug), DeviceCategory::Plug);
        assert_eq!(Switch::category_for(&record(None, None)), DeviceCategory::Switch);
    }
}
