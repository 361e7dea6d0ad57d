//! Anti-forgery state for the OAuth install flow.
//!
//! The state value is chosen by the app, sent to Shopify in the authorization
//! URL, and echoed back on the callback. An app stores it (typically in a
//! signed cookie) and rejects callbacks whose `state` does not match.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::oauth::StateParam;
//!
//! let state = StateParam::new();
//! assert_eq!(state.as_ref().len(), 15);
//! assert!(state.matches(state.as_ref()));
//! assert!(!state.matches("something-else"));
//! ```

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

use crate::auth::hmac::constant_time_compare;

/// An OAuth state token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateParam {
    value: String,
}

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    /// Length of generated nonces.
    const NONCE_LENGTH: usize = 15;

    /// Creates a state holding a fresh 15-character alphanumeric nonce drawn
    /// from a cryptographically secure generator.
    #[must_use]
    pub fn new() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::NONCE_LENGTH)
            .map(char::from)
            .collect();

        Self { value }
    }

    /// Wraps a caller-chosen state token as-is.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { value: raw.into() }
    }

    /// Compares `received` to this state in constant time.
    ///
    /// An empty state never matches.
    #[must_use]
    pub fn matches(&self, received: &str) -> bool {
        !self.value.is_empty() && constant_time_compare(&self.value, received)
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
