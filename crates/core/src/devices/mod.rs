//! Capability-driven device model
//!
//! Discovery records are turned into [`Device`] values by the
//! [`DeviceFactory`]. The variant is resolved once from the handle type;
//! afterwards callers match on the enum instead of inspecting types at
//! runtime.

mod base;
pub mod factory;
mod light;
mod lock;
pub mod ports;
pub mod registry;
mod switch;

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

pub use base::DeviceCore;
pub use factory::DeviceFactory;
pub use light::Light;
pub use lock::Lock;
pub use registry::CapabilityRegistry;
pub use switch::Switch;

/// Device variant a handle type resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Lock,
    Light,
    Switch,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lock => "lock",
            Self::Light => "light",
            Self::Switch => "switch",
        })
    }
}

/// A typed device built from a discovery record.
#[derive(Debug)]
pub enum Device {
    Lock(Lock),
    Light(Light),
    Switch(Switch),
}

impl Device {
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Lock(_) => DeviceKind::Lock,
            Self::Light(_) => DeviceKind::Light,
            Self::Switch(_) => DeviceKind::Switch,
        }
    }

    pub fn core(&self) -> &DeviceCore {
        match self {
            Self::Lock(lock) => lock.core(),
            Self::Light(light) => light.core(),
            Self::Switch(switch) => switch.core(),
        }
    }

    pub fn as_lock(&self) -> Option<&Lock> {
        match self {
            Self::Lock(lock) => Some(lock),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match self {
            Self::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_switch(&self) -> Option<&Switch> {
        match self {
            Self::Switch(switch) => Some(switch),
            _ => None,
        }
    }
}

impl Deref for Device {
    type Target = DeviceCore;

    fn deref(&self) -> &Self::Target {
        self.core()
    }
}
