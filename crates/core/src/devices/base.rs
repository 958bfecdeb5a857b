//! State and behaviour shared by every device variant

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, instrument};
use uhome_domain::{
    Capability, DeviceAttributes, DeviceCategory, DeviceCommand, DeviceInfo, DeviceStates,
    DeviceTarget, DiscoveryRecord, HandleType, Result, StateEntry, UHomeError,
};

use super::ports::DeviceGateway;

/// Identity, capabilities and last reported state of one device.
///
/// Everything except `latest_state` is fixed at construction. The gateway is
/// held weakly; the owner of the API client decides its lifetime.
pub struct DeviceCore {
    id: String,
    name: String,
    handle_type: HandleType,
    category: DeviceCategory,
    capabilities: BTreeSet<Capability>,
    info: DeviceInfo,
    attributes: DeviceAttributes,
    custom_data: Option<Value>,
    latest_state: RwLock<DeviceStates>,
    gateway: Weak<dyn DeviceGateway>,
}

impl std::fmt::Debug for DeviceCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceCore")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("handle_type", &self.handle_type)
            .field("category", &self.category)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl DeviceCore {
    pub(crate) fn from_record(
        record: &DiscoveryRecord,
        handle_type: HandleType,
        category: DeviceCategory,
        gateway: Weak<dyn DeviceGateway>,
    ) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            handle_type,
            category,
            capabilities: record.supported_capabilities.clone(),
            info: record.device_info.clone(),
            attributes: record.attributes.clone(),
            custom_data: record.custom_data.clone(),
            latest_state: RwLock::new(DeviceStates::default()),
            gateway,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle_type(&self) -> &HandleType {
        &self.handle_type
    }

    pub fn category(&self) -> DeviceCategory {
        self.category
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn attributes(&self) -> &DeviceAttributes {
        &self.attributes
    }

    pub fn custom_data(&self) -> Option<&Value> {
        self.custom_data.as_ref()
    }

    pub fn has_capability(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Copy of the most recently reported state.
    pub fn latest_state(&self) -> DeviceStates {
        self.latest_state.read().clone()
    }

    /// Reference used in query and command payloads.
    pub fn target(&self) -> DeviceTarget {
        DeviceTarget::new(self.id.clone()).with_custom_data(self.custom_data.clone())
    }

    /// Query the device and replace `latest_state` with the answer.
    #[instrument(skip(self), fields(device_id = %self.id))]
    pub async fn refresh_state(&self) -> Result<()> {
        let gateway = self.gateway()?;
        let reports = gateway.query_devices(&[self.target()]).await?;
        let report = reports.into_iter().find(|report| report.id == self.id).ok_or_else(|| {
            UHomeError::InvalidResponse(format!("query response has no state for {}", self.id))
        })?;

        self.replace_state(report.states);
        Ok(())
    }

    /// Dispatch a command; reported state in the response replaces
    /// `latest_state`.
    #[instrument(
        skip(self, capability, arguments),
        fields(device_id = %self.id, capability = %capability)
    )]
    pub async fn send(
        &self,
        capability: Capability,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<()> {
        self.require_capability(&capability)?;
        let gateway = self.gateway()?;
        let command = DeviceCommand::new(capability, name).with_arguments(arguments);

        let report = gateway.send_command(&self.target(), &command).await?;
        match report {
            Some(report) if report.id == self.id && !report.states.is_empty() => {
                self.replace_state(report.states);
            }
            _ => debug!(command = name, "command response carried no state"),
        }
        Ok(())
    }

    pub(crate) fn require_capability(&self, capability: &Capability) -> Result<()> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(UHomeError::Validation(format!(
                "device {} does not support {capability}",
                self.id
            )))
        }
    }

    pub(crate) fn state_value(
        &self,
        capability: &Capability,
        attributes: &[&str],
    ) -> Option<Value> {
        self.latest_state.read().get_any(capability, attributes).cloned()
    }

    fn replace_state(&self, entries: Vec<StateEntry>) {
        let states = DeviceStates::from_entries(entries);
        *self.latest_state.write() = states;
    }

    fn gateway(&self) -> Result<Arc<dyn DeviceGateway>> {
        self.gateway
            .upgrade()
            .ok_or_else(|| UHomeError::Internal("API client is no longer available".into()))
    }
}
