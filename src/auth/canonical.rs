//! Canonical signing strings for Shopify-signed requests.
//!
//! Shopify signs two families of inbound requests with different rules:
//!
//! | Kind | Excluded keys | Entry | Separator |
//! |------|---------------|-------|-----------|
//! | [`SignatureKind::ProxySignature`] | `signature` | `key=v1,v2` | none |
//! | [`SignatureKind::HmacDigest`] | `hmac`, `signature` | `key=v1,v2` (escaped) | `&` |
//!
//! Keys are always ordered by byte value and repeated values are joined with
//! a comma in the order they were received.
//!
//! Under [`SignatureKind::HmacDigest`], `%` and `&` are escaped in keys and
//! values, while `=` is escaped in keys only. Values keep `=` literal, so a
//! base64 value such as `host=YWRtaW4=` signs as written.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::{canonicalize, RequestParameters, SignatureKind};
//!
//! let params = RequestParameters::from_query(
//!     "shop=a.myshopify.com&timestamp=1&hmac=abc&signature=def",
//! );
//!
//! assert_eq!(
//!     canonicalize(&params, SignatureKind::HmacDigest),
//!     "shop=a.myshopify.com&timestamp=1",
//! );
//! assert_eq!(
//!     canonicalize(&params, SignatureKind::ProxySignature),
//!     "hmac=abcshop=a.myshopify.comtimestamp=1",
//! );
//! ```

use crate::auth::params::RequestParameters;
use std::fmt;

/// Which canonical form a request was signed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// Storefront requests forwarded through an app proxy.
    ProxySignature,
    /// OAuth redirects, install callbacks and embedded admin requests.
    HmacDigest,
}

impl SignatureKind {
    /// The parameter that carries the signature for this kind.
    #[must_use]
    pub const fn signature_param(self) -> &'static str {
        match self {
            Self::ProxySignature => "signature",
            Self::HmacDigest => "hmac",
        }
    }

    fn is_excluded(self, key: &str) -> bool {
        match self {
            Self::ProxySignature => key == "signature",
            Self::HmacDigest => key == "hmac" || key == "signature",
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProxySignature => f.write_str("proxy_signature"),
            Self::HmacDigest => f.write_str("hmac_digest"),
        }
    }
}

/// Builds the string that Shopify signed for `params`.
///
/// An empty parameter set, or one holding only the signature itself,
/// canonicalizes to the empty string.
#[must_use]
pub fn canonicalize(params: &RequestParameters, kind: SignatureKind) -> String {
    let entries = params
        .iter()
        .filter(|(key, _)| !kind.is_excluded(key))
        .map(|(key, values)| {
            let value = values.join(",");
            match kind {
                SignatureKind::ProxySignature => format!("{key}={value}"),
                SignatureKind::HmacDigest => {
                    format!("{}={}", escape_digest_key(key), escape_digest_value(&value))
                }
            }
        });

    match kind {
        SignatureKind::ProxySignature => entries.collect(),
        SignatureKind::HmacDigest => entries.collect::<Vec<_>>().join("&"),
    }
}

fn escape_digest_value(value: &str) -> String {
    value.replace('%', "%25").replace('&', "%26")
}

fn escape_digest_key(key: &str) -> String {
    escape_digest_value(key).replace('=', "%3D")
}
