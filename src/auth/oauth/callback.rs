//! OAuth callback verification.
//!
//! After the merchant approves an install, Shopify redirects to the app's
//! redirect URI with `code`, `shop`, `state`, `timestamp` and `hmac` query
//! parameters. Before exchanging the code, an app must check that the
//! request came from Shopify, that `state` is the one it issued, and that
//! `shop` is a storefront host.

use crate::auth::canonical::SignatureKind;
use crate::auth::hmac::verify_with_config;
use crate::auth::oauth::state::StateParam;
use crate::auth::params::RequestParameters;
use crate::auth::shop_domain::is_syntactically_valid_for;
use crate::config::AuthConfig;

/// Returns `true` if `params` is an authentic OAuth callback.
///
/// All of the following must hold:
///
/// - the `hmac` digest verifies against one of the configured secrets
/// - `state` appears exactly once and equals `expected_state`
/// - `shop` appears exactly once and is a host under the configured platform
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::auth::hmac::sign;
/// use shopify_app_auth::auth::oauth::is_authentic_callback;
/// use shopify_app_auth::auth::{RequestParameters, SignatureKind};
/// use shopify_app_auth::{ApiKey, ApiSecretKey, AuthConfig};
///
/// let config = AuthConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .api_secret_key(ApiSecretKey::new("hush").unwrap())
///     .build()
///     .unwrap();
///
/// let unsigned = RequestParameters::from_query(
///     "code=abc&shop=store.myshopify.com&state=nonce&timestamp=1337178173",
/// );
/// let hmac = sign(&unsigned, SignatureKind::HmacDigest, "hush");
/// let params = RequestParameters::from_query(&format!(
///     "code=abc&shop=store.myshopify.com&state=nonce&timestamp=1337178173&hmac={hmac}"
/// ));
///
/// assert!(is_authentic_callback(&config, &params, "nonce"));
/// assert!(!is_authentic_callback(&config, &params, "other"));
/// ```
#[must_use]
pub fn is_authentic_callback(
    config: &AuthConfig,
    params: &RequestParameters,
    expected_state: &str,
) -> bool {
    if !verify_with_config(config, params, SignatureKind::HmacDigest) {
        tracing::debug!("OAuth callback rejected: signature mismatch");
        return false;
    }

    let state_matches = match params.get("state") {
        Some([state]) => StateParam::from_raw(expected_state).matches(state),
        _ => false,
    };
    if !state_matches {
        tracing::debug!("OAuth callback rejected: state mismatch");
        return false;
    }

    let shop_valid = match params.get("shop") {
        Some([shop]) => is_syntactically_valid_for(shop, config.platform_domain()),
        _ => false,
    };
    if !shop_valid {
        tracing::debug!("OAuth callback rejected: invalid shop");
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hmac::sign;
    use crate::config::{ApiKey, ApiSecretKey, PlatformDomain};

    const UNSIGNED: &str =
        "code=0907a61c0c8d55e99db179b68161bc00&shop=some-shop.myshopify.com\
         &state=0.6784241404160823&timestamp=1337178173";
    const KNOWN_HMAC: &str = "700e2dadb827fcc8609e9d5ce208b2e9cdaab9df07390d2cbca10d7c328fc4bf";

    fn config() -> AuthConfig {
        AuthConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("hush").unwrap())
            .build()
            .unwrap()
    }

    fn signed(query: &str, secret: &str) -> RequestParameters {
        let hmac = sign(
            &RequestParameters::from_query(query),
            SignatureKind::HmacDigest,
            secret,
        );
        RequestParameters::from_query(&format!("{query}&hmac={hmac}"))
    }

    #[test]
    fn test_known_callback_is_authentic() {
        let params = RequestParameters::from_query(&format!("{UNSIGNED}&hmac={KNOWN_HMAC}"));
        assert!(is_authentic_callback(&config(), &params, "0.6784241404160823"));
    }

    #[test]
    fn test_state_mismatch_is_rejected() {
        let params = RequestParameters::from_query(&format!("{UNSIGNED}&hmac={KNOWN_HMAC}"));
        assert!(!is_authentic_callback(&config(), &params, "0.678424140416082"));
        assert!(!is_authentic_callback(&config(), &params, ""));
    }

    #[test]
    fn test_tampered_callback_is_rejected() {
        let tampered = UNSIGNED.replace("some-shop", "other-shop");
        let params = RequestParameters::from_query(&format!("{tampered}&hmac={KNOWN_HMAC}"));
        assert!(!is_authentic_callback(&config(), &params, "0.6784241404160823"));
    }

    #[test]
    fn test_missing_state_is_rejected() {
        let params = signed("code=abc&shop=store.myshopify.com&timestamp=1", "hush");
        assert!(!is_authentic_callback(&config(), &params, "nonce"));
    }

    #[test]
    fn test_foreign_shop_is_rejected_even_when_signed() {
        let params = signed("code=abc&shop=google.com&state=nonce&timestamp=1", "hush");
        assert!(!is_authentic_callback(&config(), &params, "nonce"));
    }

    #[test]
    fn test_old_secret_is_accepted_after_rotation() {
        let config = AuthConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("new-secret").unwrap())
            .old_api_secret_key(ApiSecretKey::new("hush").unwrap())
            .build()
            .unwrap();

        let params = RequestParameters::from_query(&format!("{UNSIGNED}&hmac={KNOWN_HMAC}"));
        assert!(is_authentic_callback(&config, &params, "0.6784241404160823"));
    }

    #[test]
    fn test_custom_platform_shop() {
        let config = AuthConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("hush").unwrap())
            .platform_domain(PlatformDomain::new("shop.dev").unwrap())
            .build()
            .unwrap();

        let params = signed("code=abc&shop=store.shop.dev&state=nonce&timestamp=1", "hush");
        assert!(is_authentic_callback(&config, &params, "nonce"));

        let params = signed("code=abc&shop=store.myshopify.com&state=nonce&timestamp=1", "hush");
        assert!(!is_authentic_callback(&config, &params, "nonce"));
    }
}
