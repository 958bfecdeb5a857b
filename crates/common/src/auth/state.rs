//! CSRF state for the authorization request
//!
//! The state value travels to the authorization server in the URL and must
//! come back unchanged on the redirect.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

/// Number of random bytes behind every generated state value.
pub const STATE_BYTES: usize = 32;

/// Generate a URL-safe, unpadded state value from 32 random bytes.
#[must_use]
pub fn generate_state() -> String {
    let mut random_bytes = [0u8; STATE_BYTES];
    rand::thread_rng().fill_bytes(&mut random_bytes);
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Compare the expected and received state in constant time.
///
/// # Returns
/// `true` if states match, `false` otherwise (including length mismatch)
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    let expected = expected.as_bytes();
    let actual = actual.as_bytes();
    if expected.len() != actual.len() {
        return false;
    }
    expected.iter().zip(actual).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
