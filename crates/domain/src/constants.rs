//! Client constants
//!
//! Centralized location for vendor endpoints, protocol values and default
//! timings.

// Vendor endpoints
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://oauth.u-tec.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth.u-tec.com/token";
pub const DEFAULT_ACTION_URL: &str = "https://api.u-tec.com/action";
pub const DEFAULT_SCOPE: &str = "openapi";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/";

// Action API envelope
pub const PAYLOAD_VERSION: &str = "1";

// Timing
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 60;

// Command bounds
pub const MIN_BRIGHTNESS: u32 = 0;
pub const MAX_BRIGHTNESS: u32 = 100;
pub const DEFAULT_MIN_COLOR_TEMPERATURE: u32 = 2000;
pub const DEFAULT_MAX_COLOR_TEMPERATURE: u32 = 9000;
pub const MAX_COLOR_COMPONENT: u16 = 255;

pub const USER_AGENT: &str = concat!("uhome-client/", env!("CARGO_PKG_VERSION"));
