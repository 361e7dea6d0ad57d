//! Request authentication for Shopify apps.
//!
//! Shopify signs every request it sends or forwards to an app. This module
//! checks those signatures and validates the shop domains they carry.
//!
//! # Overview
//!
//! - [`RequestParameters`]: decoded query parameters, possibly multi-valued
//! - [`canonical`]: the exact strings Shopify signs, per [`SignatureKind`]
//! - [`hmac`]: HMAC-SHA256 signing and constant-time verification
//! - [`shop_domain`]: syntactic and DNS-backed shop host validation
//! - [`AuthScopes`]: normalized, de-duplicated OAuth scope lists
//! - [`oauth`]: authorization URLs and callback verification
//!
//! # Signature kinds
//!
//! - **App proxy requests** carry `signature`; parameters are concatenated as
//!   `key=value` with no separator.
//! - **OAuth callbacks and admin requests** carry `hmac`; parameters are
//!   joined with `&` after escaping.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::hmac::is_authentic_proxy_request;
//! use shopify_app_auth::auth::RequestParameters;
//!
//! let params = RequestParameters::from_query(
//!     "extra=1&extra=2&shop=shop-name.myshopify.com&logged_in_customer_id=1\
//!      &path_prefix=%2Fapps%2Fawesome_reviews&timestamp=1317327555\
//!      &signature=4c68c8624d737112c91818c11017d24d334b524cb5c2b8ba08daa056f7395ddb",
//! );
//!
//! assert!(is_authentic_proxy_request(&params, "hush"));
//! assert!(!is_authentic_proxy_request(&params, "wrong"));
//! ```

pub mod canonical;
pub mod hmac;
pub mod oauth;
mod params;
mod scopes;
pub mod shop_domain;

pub use canonical::{canonicalize, SignatureKind};
pub use params::RequestParameters;
pub use scopes::{normalize_scope, AuthScope, AuthScopes};
pub use shop_domain::{
    is_syntactically_valid, is_valid_shop_domain, DnsResolver, HostResolver, ShopDomainValidator,
};
