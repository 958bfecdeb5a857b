//! Action API request envelope
//!
//! Every call to the action endpoint carries the same header shape:
//!
//! ```json
//! {"header": {"namespace": "Uhome.Device", "name": "Query",
//!             "messageID": "<uuid>", "payloadVersion": "1"},
//!  "payload": {...}}
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::PAYLOAD_VERSION;
use crate::types::Capability;
use crate::{Result, UHomeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiNamespace {
    #[serde(rename = "Uhome.Device")]
    Device,
    #[serde(rename = "Uhome.User")]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiOperation {
    Discovery,
    Query,
    Command,
    /// User profile lookup in the `Uhome.User` namespace.
    Get,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub namespace: ApiNamespace,
    pub name: ApiOperation,
    #[serde(rename = "messageID")]
    pub message_id: Uuid,
    #[serde(rename = "payloadVersion")]
    pub payload_version: String,
}

/// A complete request body for the action endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub header: RequestHeader,
    pub payload: Value,
}

impl RequestEnvelope {
    /// Build an envelope with a fresh correlation id. A missing payload is
    /// sent as an empty object.
    pub fn new(namespace: ApiNamespace, name: ApiOperation, payload: Option<Value>) -> Self {
        Self {
            header: RequestHeader {
                namespace,
                name,
                message_id: Uuid::new_v4(),
                payload_version: PAYLOAD_VERSION.to_string(),
            },
            payload: payload.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }

    pub fn message_id(&self) -> Uuid {
        self.header.message_id
    }
}

/// Device reference inside query and command payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTarget {
    pub id: String,
    #[serde(rename = "customData", default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

impl DeviceTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), custom_data: None }
    }

    #[must_use]
    pub fn with_custom_data(mut self, custom_data: Option<Value>) -> Self {
        self.custom_data = custom_data.filter(|value| !value.is_null());
        self
    }
}

/// Capability-scoped command descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCommand {
    pub capability: Capability,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

impl DeviceCommand {
    pub fn new(capability: Capability, name: impl Into<String>) -> Self {
        Self { capability, name: name.into(), arguments: None }
    }

    /// Attach arguments; `null` and empty objects are dropped so the field is
    /// omitted on the wire.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Option<Value>) -> Self {
        self.arguments = arguments.filter(|value| match value {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPayload {
    pub devices: Vec<DeviceTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTarget {
    #[serde(flatten)]
    pub device: DeviceTarget,
    pub command: DeviceCommand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub devices: Vec<CommandTarget>,
}

/// The `payload` object of an action API response, if it carries one.
pub fn payload_of(response: &Value) -> Option<&Value> {
    response.get("payload").filter(|payload| !payload.is_null())
}

/// Decode the `payload` object of an action API response.
pub fn decode_payload<T: DeserializeOwned>(response: &Value) -> Result<T> {
    let payload = payload_of(response)
        .ok_or_else(|| UHomeError::InvalidResponse("response has no payload".into()))?;
    T::deserialize(payload)
        .map_err(|err| UHomeError::InvalidResponse(format!("unexpected payload shape: {err}")))
}
