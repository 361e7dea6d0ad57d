//! # Shopify App Authentication
//!
//! Verification and authorization primitives for Shopify apps: checking the
//! signatures Shopify attaches to proxied requests, OAuth callbacks and
//! webhooks, validating shop domains, and building OAuth authorization URLs.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`AuthConfig`] and [`AuthConfigBuilder`]
//! - Validated newtypes for API credentials and domain values
//! - App proxy and OAuth callback HMAC verification via [`auth::hmac`]
//! - Webhook HMAC verification
//! - Shop domain validation with optional DNS confirmation
//! - OAuth scope normalization via [`AuthScopes`]
//! - OAuth authorization URL generation via [`auth::oauth`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_app_auth::{ApiKey, ApiSecretKey, AuthConfig};
//! use shopify_app_auth::auth::{RequestParameters, SignatureKind};
//! use shopify_app_auth::auth::hmac::verify_with_config;
//!
//! let config = AuthConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("hush").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let params = RequestParameters::from_query(
//!     "code=0907a61c0c8d55e99db179b68161bc00&shop=some-shop.myshopify.com\
//!      &state=0.6784241404160823&timestamp=1337178173\
//!      &hmac=700e2dadb827fcc8609e9d5ce208b2e9cdaab9df07390d2cbca10d7c328fc4bf",
//! );
//!
//! assert!(verify_with_config(&config, &params, SignatureKind::HmacDigest));
//! ```
//!
//! ## OAuth Authorization
//!
//! ```rust
//! use shopify_app_auth::{AuthScope, AuthScopes};
//! use shopify_app_auth::auth::oauth::build_authorization_url;
//!
//! let scopes = AuthScopes::from_iter([AuthScope::ReadProducts, AuthScope::WriteOrders]);
//! let url = build_authorization_url(
//!     scopes.iter(),
//!     "example-shop.myshopify.com",
//!     "your-api-key",
//!     "https://your-app.com/auth/callback",
//!     Some("nonce"),
//!     None::<Vec<String>>,
//! )
//! .unwrap();
//!
//! assert!(url.as_str().contains("scope=read_products,write_orders"));
//! ```
//!
//! ## Shop Domain Validation
//!
//! ```rust
//! use shopify_app_auth::auth::is_syntactically_valid;
//!
//! assert!(is_syntactically_valid("https://my-store.myshopify.com/"));
//! assert!(!is_syntactically_valid("https://google.com"));
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Fail-closed verification**: Malformed input is rejected, never an error
//! - **Thread-safe**: All types are `Send + Sync`

pub mod auth;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::{AuthScope, AuthScopes, RequestParameters, SignatureKind};
pub use config::{ApiKey, ApiSecretKey, AuthConfig, AuthConfigBuilder, PlatformDomain, ShopDomain};
pub use error::ConfigError;

// Re-export OAuth types for convenience
pub use auth::oauth::{
    build_authorization_url, is_authentic_callback, AuthorizationUrlSpec, OAuthError, StateParam,
};
