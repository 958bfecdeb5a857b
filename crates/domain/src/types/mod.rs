//! Domain types and models
//!
//! Wire types for the U-Home action API plus the device vocabulary shared by
//! the device model.

pub mod capability;
pub mod discovery;
pub mod envelope;
pub mod state;

pub use capability::{Capability, HandleType};
pub use discovery::{
    ColorTemperatureRange, DeviceAttributes, DeviceCategory, DeviceInfo, DiscoveryPayload,
    DiscoveryRecord,
};
pub use envelope::{
    decode_payload, payload_of, ApiNamespace, ApiOperation, CommandPayload, CommandTarget,
    DeviceCommand, DeviceTarget, QueryPayload, RequestEnvelope, RequestHeader,
};
pub use state::{
    BatteryLevel, DeviceStateReport, DeviceStates, DoorState, LockState, PowerState, StateEntry,
    StatesPayload,
};
