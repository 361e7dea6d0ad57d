//! OAuth install flow helpers for Shopify apps.
//!
//! This module covers the two steps of the authorization code grant that do
//! not talk to Shopify:
//!
//! 1. **Authorization URL** ([`build_authorization_url`], [`AuthorizationUrlSpec`]):
//!    the URL a merchant is redirected to when installing the app.
//! 2. **Callback verification** ([`is_authentic_callback`]): checks the
//!    redirect Shopify sends back, before the app exchanges the code.
//!
//! Exchanging the code for an access token is left to the caller's HTTP stack.
//!
//! # Security
//!
//! - **HMAC Validation**: callbacks are verified using HMAC-SHA256 signatures
//! - **CSRF Protection**: [`StateParam`] ties a callback to the request that began it
//! - **Constant-Time Comparison**: signature and state checks do not leak timing
//! - **Key Rotation Support**: an old API secret key keeps in-flight installs working
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::oauth::{build_authorization_url, StateParam, PER_USER_GRANT};
//!
//! let state = StateParam::new();
//! let url = build_authorization_url(
//!     ["read_products", "write_orders"],
//!     "example-shop.myshopify.com",
//!     "your-api-key",
//!     "https://your-app.com/auth/callback",
//!     Some(state.as_ref()),
//!     Some([PER_USER_GRANT]),
//! )
//! .unwrap();
//!
//! assert_eq!(url.host_str(), Some("example-shop.myshopify.com"));
//! // Redirect the merchant to `url` and remember `state` for the callback.
//! ```

mod authorization_url;
mod callback;
mod error;
mod state;

pub use authorization_url::{
    build_authorization_url, build_authorization_url_with_config, AuthorizationUrlSpec,
    AuthorizationUrlSpecBuilder, PER_USER_GRANT,
};
pub use callback::is_authentic_callback;
pub use error::OAuthError;
pub use state::StateParam;
