//! # U-Home Core
//!
//! Device model and business rules - no infrastructure dependencies.
//!
//! This crate contains:
//! - The `DeviceGateway` port the device model talks through
//! - The capability registry and device factory
//! - Typed device variants (lock, light, switch)
//!
//! ## Architecture Principles
//! - Only depends on `uhome-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod devices;

pub use devices::ports::DeviceGateway;
pub use devices::{
    CapabilityRegistry, Device, DeviceCore, DeviceFactory, DeviceKind, Light, Lock, Switch,
};
