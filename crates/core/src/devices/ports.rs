//! Port interfaces for device communication
//!
//! Devices never talk HTTP themselves; they query and command through this
//! trait, which the infrastructure API client implements.

use async_trait::async_trait;
use uhome_domain::{DeviceCommand, DeviceStateReport, DeviceTarget, Result};

/// Trait for dispatching device queries and commands
#[async_trait]
pub trait DeviceGateway: Send + Sync {
    /// Query the current state of one or more devices
    async fn query_devices(&self, targets: &[DeviceTarget]) -> Result<Vec<DeviceStateReport>>;

    /// Send a capability-scoped command to one device
    ///
    /// Returns the state the vendor reported back for the device, if the
    /// response carried any.
    async fn send_command(
        &self,
        target: &DeviceTarget,
        command: &DeviceCommand,
    ) -> Result<Option<DeviceStateReport>>;
}
