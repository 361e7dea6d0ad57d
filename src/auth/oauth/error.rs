//! OAuth-specific error types.
//!
//! These errors report caller bugs while assembling an authorization URL:
//! a shop that is not a storefront domain, an empty redirect target, or
//! invalid credentials and scopes. They are never produced while checking
//! an inbound request.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::oauth::OAuthError;
//!
//! let error = OAuthError::EmptyRedirectUri;
//! assert_eq!(error.to_string(), "Redirect URI cannot be empty");
//! ```

use crate::error::ConfigError;
use thiserror::Error;

/// Errors that can occur while building an OAuth authorization URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// The shop domain is not a valid storefront host.
    #[error("Invalid shop domain '{domain}' for OAuth authorization")]
    InvalidShopDomain {
        /// The domain that was provided.
        domain: String,
    },

    /// The redirect URI is empty.
    #[error("Redirect URI cannot be empty")]
    EmptyRedirectUri,

    /// A required builder field was not set.
    #[error("Missing required field: '{field}'")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Wrapped configuration error (empty API key, invalid scopes).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
