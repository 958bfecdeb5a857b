//! Dimmable and color lights
//!
//! Every setter validates its argument before anything is sent; an
//! out-of-range value never reaches the gateway.

use std::ops::Deref;

use serde_json::{json, Value};
use uhome_domain::constants::{
    DEFAULT_MAX_COLOR_TEMPERATURE, DEFAULT_MIN_COLOR_TEMPERATURE, MAX_BRIGHTNESS,
    MAX_COLOR_COMPONENT, MIN_BRIGHTNESS,
};
use uhome_domain::{Capability, ColorTemperatureRange, PowerState, Result, UHomeError};

use super::DeviceCore;

#[derive(Debug)]
pub struct Light {
    core: DeviceCore,
}

impl Light {
    pub(crate) fn new(core: DeviceCore) -> Self {
        Self { core }
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

    /// Set brightness in percent (0-100).
    pub async fn set_brightness(&self, level: u32) -> Result<()> {
        if !(MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&level) {
            return Err(UHomeError::Validation(format!(
                "brightness must be between {MIN_BRIGHTNESS} and {MAX_BRIGHTNESS}, got {level}"
            )));
        }
        self.core.send(Capability::Brightness, "level", Some(json!({ "value": level }))).await
    }

    /// Range declared in discovery, or 2000-9000 K when none was declared.
    pub fn color_temperature_range(&self) -> ColorTemperatureRange {
        self.core.attributes().color_temperature_range.unwrap_or(ColorTemperatureRange {
            min: DEFAULT_MIN_COLOR_TEMPERATURE,
            max: DEFAULT_MAX_COLOR_TEMPERATURE,
            step: None,
        })
    }

    /// Set color temperature in Kelvin.
    pub async fn set_color_temperature(&self, kelvin: u32) -> Result<()> {
        let range = self.color_temperature_range();
        if !range.contains(kelvin) {
            return Err(UHomeError::Validation(format!(
                "color temperature must be between {}K and {}K, got {kelvin}K",
                range.min, range.max
            )));
        }
        self.core
            .send(Capability::ColorTemperature, "temperature", Some(json!({ "value": kelvin })))
            .await
    }

    /// Set an RGB color; each component must be 0-255.
    pub async fn set_color(&self, r: u16, g: u16, b: u16) -> Result<()> {
        for (channel, value) in [("red", r), ("green", g), ("blue", b)] {
            if value > MAX_COLOR_COMPONENT {
                return Err(UHomeError::Validation(format!(
                    "{channel} must be between 0 and {MAX_COLOR_COMPONENT}, got {value}"
                )));
            }
        }
        self.core
            .send(Capability::Color, "color", Some(json!({ "value": { "r": r, "g": g, "b": b } })))
            .await
    }

    pub fn is_on(&self) -> bool {
        self.core
            .state_value(&Capability::Switch, &["switch"])
            .and_then(|value| PowerState::from_value(&value))
            == Some(PowerState::On)
    }

    pub fn brightness(&self) -> Option<u32> {
        self.core.state_value(&Capability::Brightness, &["level"]).and_then(|v| as_u32(&v))
    }

    pub fn color_temperature(&self) -> Option<u32> {
        self.core
            .state_value(&Capability::ColorTemperature, &["temperature"])
            .and_then(|v| as_u32(&v))
    }

    pub fn rgb_color(&self) -> Option<(u8, u8, u8)> {
        let color = self.core.state_value(&Capability::Color, &["color"])?;
        let channel =
            |key: &str| color.get(key).and_then(Value::as_u64).and_then(|c| u8::try_from(c).ok());
        Some((channel("r")?, channel("g")?, channel("b")?))
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

impl Deref for Light {
    type Target = DeviceCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}
