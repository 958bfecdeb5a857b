//! OAuth 2.0 authorization-code infrastructure
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ AuthenticationHandler│  (uhome-infra) browser + callback orchestration
//! └──────────┬───────────┘
//!            │
//!            ├──► OAuthClient   (token endpoint: code exchange, refresh)
//!            ├──► TokenStore    (current TokenSet, 5 minute safety margin)
//!            └──► state utils   (CSRF state generation and comparison)
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenSet`, `TokenResponse`, `OAuthConfig`
//! - **[`state`]**: state generation and constant-time validation
//! - **[`client`]**: authorization URL building and token endpoint calls
//! - **[`token_store`]**: thread-safe holder of the current token set
//! - **[`traits`]**: `OAuthClientTrait` for injecting alternate token
//!   endpoints

pub mod client;
pub mod state;
pub mod token_store;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use client::{OAuthClient, OAuthClientError};
pub use state::{generate_state, validate_state};
pub use token_store::{TokenStore, EXPIRY_MARGIN_SECS};
pub use traits::OAuthClientTrait;
pub use types::{OAuthConfig, TokenResponse, TokenSet};
