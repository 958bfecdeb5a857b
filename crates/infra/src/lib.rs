//! # U-Home Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The interactive OAuth flow (callback listener, browser launch)
//! - The action API client, which implements `uhome_core::DeviceGateway`
//! - The HTTP transport shared by the API client
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `uhome-core`
//! - Depends on `uhome-common` for the token endpoint client and store
//! - Contains all "impure" code (sockets, HTTP, processes, files)

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiClient, ApiClientConfig};
pub use auth::{AuthenticationHandler, CallbackListener, CallbackParams, SystemBrowser, UriOpener};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
