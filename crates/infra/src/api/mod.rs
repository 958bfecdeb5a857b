//! U-Home action API client
//!
//! Every device operation is a POST of a [`RequestEnvelope`] to the single
//! action endpoint. The client attaches a bearer token obtained from an
//! [`AccessTokenProvider`], classifies the response status and exposes the
//! result as JSON. It also implements the core `DeviceGateway` port so that
//! device objects can query and command through it.
//!
//! [`RequestEnvelope`]: uhome_domain::RequestEnvelope

pub mod auth;
pub mod client;

pub use auth::AccessTokenProvider;
pub use client::{ApiClient, ApiClientConfig};
