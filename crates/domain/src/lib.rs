//! # U-Home Domain
//!
//! Domain types and models shared by every U-Home crate.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Wire types for the action API (request envelope, discovery records)
//! - Capability tags, handle types and device state vocabulary
//!
//! ## Architecture
//! - No dependencies on other U-Home crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
