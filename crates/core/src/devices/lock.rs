//! Smart locks, optionally with a door sensor

use std::ops::Deref;

use uhome_domain::{BatteryLevel, Capability, DoorState, LockState, Result};

use super::DeviceCore;

#[derive(Debug)]
pub struct Lock {
    core: DeviceCore,
}

impl Lock {
    pub(crate) fn new(core: DeviceCore) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &DeviceCore {
        &self.core
    }

    pub async fn lock(&self) -> Result<()> {
        self.core.send(Capability::Lock, "lock", None).await
    }

    pub async fn unlock(&self) -> Result<()> {
        self.core.send(Capability::Lock, "unlock", None).await
    }

    /// Last reported lock state; `Unknown` until a state was reported.
    pub fn lock_state(&self) -> LockState {
        self.core
            .state_value(&Capability::Lock, &["lockState"])
            .and_then(|value| LockState::from_value(&value))
            .unwrap_or(LockState::Unknown)
    }

    pub fn is_locked(&self) -> bool {
        self.lock_state() == LockState::Locked
    }

    pub fn battery_level(&self) -> Option<BatteryLevel> {
        self.core
            .state_value(&Capability::BatteryLevel, &["level"])
            .and_then(|value| BatteryLevel::from_value(&value))
    }

    pub fn has_door_sensor(&self) -> bool {
        self.core.has_capability(&Capability::DoorSensor)
    }

    /// `None` when the lock has no door sensor.
    pub fn door_state(&self) -> Option<DoorState> {
        if !self.has_door_sensor() {
            return None;
        }
        let state = self
            .core
            .state_value(&Capability::DoorSensor, &["sensorState", "doorState"])
            .and_then(|value| DoorState::from_value(&value))
            .unwrap_or(DoorState::Unknown);
        Some(state)
    }

    /// `None` when the lock has no door sensor.
    pub fn is_door_closed(&self) -> Option<bool> {
        self.door_state().map(|state| state == DoorState::Closed)
    }
}

impl Deref for Lock {
    type Target = DeviceCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}
