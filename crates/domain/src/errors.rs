//! Error types used throughout the client

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Capability;

/// Main error type for the U-Home client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum UHomeError {
    /// OAuth flow failures: state mismatch, timeout, token endpoint
    /// rejection, missing refresh token.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-success response from the action API.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Command argument rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures raised while turning discovery records into devices.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceError {
    #[error("device '{device_id}' has no handle type")]
    MissingHandleType { device_id: String },

    #[error("device '{device_id}' is missing required capabilities: {}", format_capabilities(.missing))]
    MissingCapabilities { device_id: String, missing: BTreeSet<Capability> },

    #[error("malformed discovery record: {0}")]
    MalformedRecord(String),
}

impl UHomeError {
    /// Status code carried by an [`UHomeError::Api`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

fn format_capabilities(caps: &BTreeSet<Capability>) -> String {
    caps.iter().map(Capability::as_tag).collect::<Vec<_>>().join(", ")
}

/// Result type alias for U-Home operations
pub type Result<T> = std::result::Result<T, UHomeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_capabilities_lists_every_tag() {
        let err = DeviceError::MissingCapabilities {
            device_id: "lock-1".into(),
            missing: [Capability::LockUser, Capability::DoorSensor].into_iter().collect(),
        };

        let message = err.to_string();
        assert!(message.contains("lock-1"));
        assert!(message.contains("st.lockUser"));
        assert!(message.contains("st.doorSensor"));
    }

    #[test]
    fn api_error_exposes_status() {
        let err = UHomeError::Api { status: 500, body: "boom".into() };
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("boom"));
        assert_eq!(UHomeError::Validation("x".into()).status(), None);
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = UHomeError::Authentication("timeout".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Authentication");
        assert_eq!(json["message"], "timeout");
    }
}
