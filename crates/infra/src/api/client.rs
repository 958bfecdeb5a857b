//! Action endpoint client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};
use uhome_core::DeviceGateway;
use uhome_domain::constants::{DEFAULT_ACTION_URL, DEFAULT_API_TIMEOUT_SECS};
use uhome_domain::{
    decode_payload, payload_of, ApiConfig, ApiNamespace, ApiOperation, Capability,
    CommandPayload, CommandTarget, DeviceCommand, DeviceStateReport, DeviceTarget,
    QueryPayload, RequestEnvelope, Result, StatesPayload, UHomeError,
};

use super::auth::AccessTokenProvider;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Action endpoint every envelope is posted to
    pub action_url: String,
    /// Timeout for each request
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            action_url: DEFAULT_ACTION_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self { action_url: config.action_url.clone(), timeout: config.timeout() }
    }
}

/// Client for the U-Home action API.
///
/// Requests are sent once; a non-success status is returned to the caller
/// as [`UHomeError::Api`] with the raw body.
pub struct ApiClient {
    http: RwLock<Option<HttpClient>>,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP transport cannot be created
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http: RwLock::new(Some(http)), auth, config })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Post one envelope to the action endpoint and classify the response.
    ///
    /// - 200, 201, 202: the decoded JSON body (`{}` when the body is empty)
    /// - 204: `{}`
    /// - anything else: [`UHomeError::Api`] with the status and raw body
    #[instrument(skip(self, payload), fields(namespace = ?namespace, operation = ?operation))]
    pub async fn dispatch(
        &self,
        namespace: ApiNamespace,
        operation: ApiOperation,
        payload: Option<Value>,
    ) -> Result<Value> {
        let http = self.transport()?;
        let token = self.auth.access_token().await?;

        let envelope = RequestEnvelope::new(namespace, operation, payload);
        debug!(message_id = %envelope.message_id(), url = %self.config.action_url, "POST action");

        let request = http
            .request(Method::POST, &self.config.action_url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&envelope);

        let response = http.send(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| UHomeError::from(InfraError::from(err)))?;

        match status {
            200..=202 => parse_body(&body),
            204 => Ok(empty_object()),
            _ => {
                error!(status, body = %body, "action API returned an error");
                Err(UHomeError::Api { status, body })
            }
        }
    }

    /// Raw discovery response; feed it to `DeviceFactory::create_devices`.
    pub async fn discover_devices(&self) -> Result<Value> {
        debug!("discovering devices");
        self.dispatch(ApiNamespace::Device, ApiOperation::Discovery, Some(empty_object())).await
    }

    pub async fn query_device(&self, device_id: &str) -> Result<Value> {
        self.query_targets(&[DeviceTarget::new(device_id)]).await
    }

    /// Query several devices at once; `custom_data` is attached to every
    /// target when given.
    pub async fn query_devices<I, S>(
        &self,
        device_ids: I,
        custom_data: Option<Value>,
    ) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets: Vec<DeviceTarget> = device_ids
            .into_iter()
            .map(|id| DeviceTarget::new(id).with_custom_data(custom_data.clone()))
            .collect();
        self.query_targets(&targets).await
    }

    /// Send one capability command. Absent or empty `arguments` are left
    /// out of the request.
    pub async fn send_command(
        &self,
        device_id: &str,
        capability: Capability,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<Value> {
        let command = DeviceCommand::new(capability, name).with_arguments(arguments);
        self.command_target(&DeviceTarget::new(device_id), &command).await
    }

    /// Profile of the authenticated user.
    pub async fn get_user(&self) -> Result<Value> {
        self.dispatch(ApiNamespace::User, ApiOperation::Get, None).await
    }

    /// `true` when a discovery call succeeds. API rejections yield `false`;
    /// authentication and transport failures are still returned as errors.
    pub async fn validate_auth(&self) -> Result<bool> {
        match self.discover_devices().await {
            Ok(_) => Ok(true),
            Err(UHomeError::Api { status, .. }) => {
                warn!(status, "credential check rejected by the action API");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Release the transport. Safe to call more than once.
    pub fn close(&self) {
        if self.http.write().take().is_some() {
            info!("api client closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.http.read().is_none()
    }

    async fn query_targets(&self, targets: &[DeviceTarget]) -> Result<Value> {
        let payload = QueryPayload { devices: targets.to_vec() };
        self.dispatch(ApiNamespace::Device, ApiOperation::Query, Some(to_value(&payload)?)).await
    }

    async fn command_target(
        &self,
        target: &DeviceTarget,
        command: &DeviceCommand,
    ) -> Result<Value> {
        debug!(
            device_id = %target.id,
            capability = %command.capability,
            name = %command.name,
            "sending command"
        );
        let payload = CommandPayload {
            devices: vec![CommandTarget { device: target.clone(), command: command.clone() }],
        };
        self.dispatch(ApiNamespace::Device, ApiOperation::Command, Some(to_value(&payload)?)).await
    }

    fn transport(&self) -> Result<HttpClient> {
        self.http
            .read()
            .clone()
            .ok_or_else(|| UHomeError::Config("api client is closed".into()))
    }
}

#[async_trait]
impl DeviceGateway for ApiClient {
    async fn query_devices(&self, targets: &[DeviceTarget]) -> Result<Vec<DeviceStateReport>> {
        let response = self.query_targets(targets).await?;
        let states: StatesPayload = decode_payload(&response)?;
        Ok(states.devices)
    }

    async fn send_command(
        &self,
        target: &DeviceTarget,
        command: &DeviceCommand,
    ) -> Result<Option<DeviceStateReport>> {
        let response = self.command_target(target, command).await?;
        if payload_of(&response).is_none() {
            return Ok(None);
        }
        let states: StatesPayload = decode_payload(&response)?;
        Ok(states.devices.into_iter().find(|report| report.id == target.id))
    }
}

fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(empty_object());
    }
    serde_json::from_str(body)
        .map_err(|err| UHomeError::InvalidResponse(format!("action API body is not JSON: {err}")))
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn to_value<T: serde::Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload)
        .map_err(|err| UHomeError::Internal(format!("failed to encode payload: {err}")))
}
