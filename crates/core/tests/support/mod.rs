//! Shared test helpers for `uhome-core` integration tests.

#![allow(dead_code)]

pub mod gateway;

use serde_json::{json, Value};

/// Discovery response holding the given raw device entries.
pub fn discovery_response(devices: Vec<Value>) -> Value {
    json!({
        "header": {"namespace": "Uhome.Device", "name": "Discovery", "messageID": "m-1", "payloadVersion": "1"},
        "payload": {"devices": devices}
    })
}

pub fn lock_record(id: &str, capabilities: &[&str]) -> Value {
    json!({
        "id": id,
        "name": "Front Door",
        "handleType": "utec-lock",
        "category": "SmartLock",
        "supportedCapabilities": capabilities,
        "deviceInfo": {"manufacturer": "U-tec", "model": "U-Bolt-PRO"},
        "customData": {"lockId": 77}
    })
}

pub fn light_record(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Porch",
        "handleType": "utec-light-rgbaw-br",
        "category": "light",
        "supportedCapabilities": ["st.switch", "st.brightness", "st.color", "st.colorTemperature"],
        "attributes": {"colorTemperatureRange": {"min": 2700, "max": 6500, "step": 100}}
    })
}

pub fn switch_record(id: &str, category: &str) -> Value {
    json!({
        "id": id,
        "name": "Lamp",
        "handleType": "utec-switch",
        "category": category,
        "supportedCapabilities": ["st.switch", "st.healthCheck"]
    })
}
