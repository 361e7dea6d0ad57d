//! HMAC verification for Shopify-signed requests.
//!
//! This module computes and checks the HMAC-SHA256 signatures Shopify attaches
//! to app proxy requests, OAuth callbacks and webhook deliveries.
//!
//! # Security
//!
//! - Every comparison is constant-time.
//! - Every check answers with a `bool`. A missing signature, an empty secret,
//!   a malformed parameter set and a wrong digest are indistinguishable to the
//!   caller, so a hosting web layer can only respond with a uniform denial.
//! - Nothing here keeps state between calls; the functions are safe to call
//!   from any number of threads or tasks at once.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::hmac::{is_authentic_proxy_request, sign, verify};
//! use shopify_app_auth::auth::{RequestParameters, SignatureKind};
//!
//! let params = RequestParameters::from_query(
//!     "extra=1&extra=2&shop=shop-name.myshopify.com&logged_in_customer_id=1\
//!      &path_prefix=%2Fapps%2Fawesome_reviews&timestamp=1317327555\
//!      &signature=4c68c8624d737112c91818c11017d24d334b524cb5c2b8ba08daa056f7395ddb",
//! );
//! assert!(is_authentic_proxy_request(&params, "hush"));
//!
//! let signature = sign(&params, SignatureKind::HmacDigest, "hush");
//! assert!(verify(&params, SignatureKind::HmacDigest, &signature, "hush"));
//! assert!(!verify(&params, SignatureKind::ProxySignature, &signature, "hush"));
//! ```

use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::canonical::{canonicalize, SignatureKind};
use crate::auth::params::RequestParameters;
use crate::config::AuthConfig;

type HmacSha256 = Hmac<Sha256>;

/// Computes an HMAC-SHA256 signature over `message`, as lowercase hex.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::auth::hmac::compute_signature;
///
/// let sig = compute_signature(b"message", b"key");
/// assert_eq!(sig, "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a");
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &[u8], secret: &[u8]) -> String {
    hex::encode(digest(message, secret))
}

/// Computes an HMAC-SHA256 signature over `message`, as standard base64.
///
/// This is the encoding Shopify uses in the `X-Shopify-Hmac-SHA256` webhook header.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature_base64(message: &[u8], secret: &[u8]) -> String {
    BASE64_STANDARD.encode(digest(message, secret))
}

fn digest(message: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Performs constant-time comparison of two strings.
///
/// Strings of different lengths compare unequal without inspecting content.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Signs `params` the way Shopify would for the given kind.
///
/// Any signature parameter already present is ignored, so re-signing a
/// captured request yields the signature it should carry.
#[must_use]
pub fn sign(params: &RequestParameters, kind: SignatureKind, secret: impl AsRef<[u8]>) -> String {
    compute_signature(canonicalize(params, kind).as_bytes(), secret.as_ref())
}

/// Checks `provided_signature` against the signature computed for `params`.
///
/// Hex case in `provided_signature` is ignored. Returns `false` when the
/// signature is empty, the secret is empty, or the digests differ.
#[must_use]
pub fn verify(
    params: &RequestParameters,
    kind: SignatureKind,
    provided_signature: &str,
    secret: impl AsRef<[u8]>,
) -> bool {
    let secret = secret.as_ref();
    if secret.is_empty() {
        tracing::warn!(%kind, "signature verification attempted with an empty secret");
        return false;
    }
    if provided_signature.is_empty() {
        return false;
    }

    let expected = sign(params, kind, secret);
    let verified = constant_time_compare(&expected, &provided_signature.to_ascii_lowercase());
    if !verified {
        tracing::debug!(%kind, "request signature denied");
    }
    verified
}

/// Verifies a request whose signature travels inside `params`.
///
/// The signature is read from [`SignatureKind::signature_param`]. A request
/// without it, or carrying it more than once, is denied.
#[must_use]
pub fn verify_request(
    params: &RequestParameters,
    kind: SignatureKind,
    secret: impl AsRef<[u8]>,
) -> bool {
    match params.get(kind.signature_param()) {
        Some([signature]) => verify(params, kind, signature, secret),
        _ => false,
    }
}

/// Verifies a storefront request forwarded through an app proxy.
#[must_use]
pub fn is_authentic_proxy_request(params: &RequestParameters, secret: impl AsRef<[u8]>) -> bool {
    verify_request(params, SignatureKind::ProxySignature, secret)
}

/// Verifies an OAuth callback or embedded admin request carrying `hmac`.
#[must_use]
pub fn is_authentic_request(params: &RequestParameters, secret: impl AsRef<[u8]>) -> bool {
    verify_request(params, SignatureKind::HmacDigest, secret)
}

/// Verifies a request against the secrets in `config`.
///
/// The primary secret is tried first, then `old_api_secret_key` if one is
/// configured, so signatures made before a key rotation keep verifying.
#[must_use]
pub fn verify_with_config(
    config: &AuthConfig,
    params: &RequestParameters,
    kind: SignatureKind,
) -> bool {
    config
        .secrets()
        .any(|secret| verify_request(params, kind, secret))
}

/// Verifies a webhook delivery.
///
/// `hmac_header` is the base64 value of the `X-Shopify-Hmac-SHA256` header and
/// `raw_body` the request body exactly as received.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::auth::hmac::{compute_signature_base64, is_authentic_webhook};
///
/// let body = br#"{"id":1}"#;
/// let header = compute_signature_base64(body, b"secret");
/// assert!(is_authentic_webhook(body, &header, "secret"));
/// assert!(!is_authentic_webhook(b"{}", &header, "secret"));
/// ```
#[must_use]
pub fn is_authentic_webhook(raw_body: &[u8], hmac_header: &str, secret: impl AsRef<[u8]>) -> bool {
    let secret = secret.as_ref();
    if secret.is_empty() {
        tracing::warn!("webhook verification attempted with an empty secret");
        return false;
    }
    if hmac_header.is_empty() {
        return false;
    }

    let computed = compute_signature_base64(raw_body, secret);
    constant_time_compare(&computed, hmac_header.trim())
}
