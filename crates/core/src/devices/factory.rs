//! Discovery record to device construction

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::{debug, info, warn};
use uhome_domain::{
    decode_payload, Capability, DeviceCategory, DeviceError, DiscoveryPayload, DiscoveryRecord,
    HandleType, Result,
};

use super::ports::DeviceGateway;
use super::registry::{CapabilityRegistry, DEFAULT_HANDLE_TYPES};
use super::{Device, DeviceCore, DeviceKind, Light, Lock, Switch};

/// Builds typed devices from discovery records.
///
/// Handle types without a registered variant are skipped. A registered
/// handle type whose record lacks a required capability is an error.
pub struct DeviceFactory {
    registry: CapabilityRegistry,
    variants: HashMap<HandleType, DeviceKind>,
    gateway: Weak<dyn DeviceGateway>,
}

impl DeviceFactory {
    /// Factory using `registry` for capability checks and the built-in
    /// handle type to variant table.
    pub fn new(registry: CapabilityRegistry, gateway: Weak<dyn DeviceGateway>) -> Self {
        let variants = DEFAULT_HANDLE_TYPES
            .iter()
            .map(|(handle_type, kind, _)| (HandleType::new(handle_type), *kind))
            .collect();
        Self { registry, variants, gateway }
    }

    /// Factory with the default registry, bound to `gateway`.
    pub fn for_gateway<G: DeviceGateway + 'static>(gateway: &Arc<G>) -> Self {
        let weak: Weak<G> = Arc::downgrade(gateway);
        let gateway: Weak<dyn DeviceGateway> = weak;
        Self::new(CapabilityRegistry::with_defaults(), gateway)
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Map `handle_type` to `kind` with the given required capabilities.
    /// Last writer wins.
    pub fn register_handle_type(
        &mut self,
        handle_type: HandleType,
        kind: DeviceKind,
        required: impl IntoIterator<Item = Capability>,
    ) {
        debug!(%handle_type, %kind, "registering handle type");
        self.registry.register(handle_type.clone(), required);
        self.variants.insert(handle_type, kind);
    }

    /// Handle types this factory can build, sorted.
    pub fn supported_handle_types(&self) -> Vec<HandleType> {
        let mut handle_types: Vec<_> = self.variants.keys().cloned().collect();
        handle_types.sort();
        handle_types
    }

    /// Build one device. `Ok(None)` means the handle type is not supported.
    pub fn create_device(&self, record: &DiscoveryRecord) -> Result<Option<Device>> {
        let handle_type = record
            .handle_type
            .clone()
            .filter(|handle_type| !handle_type.is_empty())
            .ok_or_else(|| DeviceError::MissingHandleType { device_id: record.id.clone() })?;

        let Some(kind) = self.variants.get(&handle_type).copied() else {
            warn!(device_id = %record.id, %handle_type, "unsupported handle type, skipping device");
            return Ok(None);
        };

        let missing: BTreeSet<Capability> = self
            .registry
            .required_capabilities(&handle_type)
            .difference(&record.supported_capabilities)
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(
                DeviceError::MissingCapabilities { device_id: record.id.clone(), missing }.into()
            );
        }

        let category = match kind {
            DeviceKind::Lock => DeviceCategory::Lock,
            DeviceKind::Light => DeviceCategory::Light,
            DeviceKind::Switch => Switch::category_for(record),
        };
        let core = DeviceCore::from_record(record, handle_type, category, self.gateway.clone());

        debug!(device_id = %record.id, %kind, %category, "created device");
        Ok(Some(match kind {
            DeviceKind::Lock => Device::Lock(Lock::new(core)),
            DeviceKind::Light => Device::Light(Light::new(core)),
            DeviceKind::Switch => Device::Switch(Switch::new(core)),
        }))
    }

    /// Parse and build one raw discovery entry.
    ///
    /// Entries of an unsupported handle type are skipped before the full
    /// decode, so their shape never fails discovery.
    pub fn create_device_from_value(&self, raw: &Value) -> Result<Option<Device>> {
        if let Some(handle_type) = raw.get("handleType").and_then(Value::as_str) {
            let handle_type = HandleType::new(handle_type);
            if !handle_type.is_empty() && !self.variants.contains_key(&handle_type) {
                let device_id = raw.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
                warn!(device_id, %handle_type, "unsupported handle type, skipping device");
                return Ok(None);
            }
        }

        let record: DiscoveryRecord = serde_json::from_value(raw.clone()).map_err(|err| {
            let id = raw.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
            DeviceError::MalformedRecord(format!("{id}: {err}"))
        })?;
        self.create_device(&record)
    }

    /// Build every supported device in a discovery response.
    pub fn create_devices(&self, discovery_response: &Value) -> Result<Vec<Device>> {
        let payload: DiscoveryPayload = decode_payload(discovery_response)?;
        let mut devices = Vec::with_capacity(payload.devices.len());
        for raw in &payload.devices {
            if let Some(device) = self.create_device_from_value(raw)? {
                devices.push(device);
            }
        }
        info!(discovered = payload.devices.len(), created = devices.len(), "built devices");
        Ok(devices)
    }
}
