//! Macro for implementing conversions on device state enums
//!
//! The action API reports most enumerated states either as a lowercase
//! string (`"locked"`) or as a numeric code (`1`). This macro generates
//! `Display`, case-insensitive `FromStr` and a `from_value` parser that
//! accepts both forms.
//!
//! # Example
//!
//! ```rust
//! use uhome_domain::impl_state_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum PowerState {
//!     On,
//!     Off,
//! }
//!
//! impl_state_conversions!(PowerState {
//!     On => "on" | 1,
//!     Off => "off" | 2,
//! });
//!
//! assert_eq!(PowerState::from_value(&serde_json::json!("ON")), Some(PowerState::On));
//! assert_eq!(PowerState::from_value(&serde_json::json!(2)), Some(PowerState::Off));
//! ```

/// Implements `Display`, `FromStr` and `from_value` for state enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str | $code` - Mapping of enum variants to their lowercase
///   string representation and numeric wire code
#[macro_export]
macro_rules! impl_state_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal | $code:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }

        impl $enum_name {
            /// Map a numeric wire code to a variant.
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Parse a reported state value given as a string or a code.
            pub fn from_value(value: &serde_json::Value) -> Option<Self> {
                match value {
                    serde_json::Value::String(s) => s.parse().ok(),
                    serde_json::Value::Number(n) => n.as_i64().and_then(Self::from_code),
                    _ => None,
                }
            }
        }
    };
}
