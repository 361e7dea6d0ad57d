//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::auth::shop_domain::normalize_shop_host;
use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Shopify API key (the public OAuth client identifier).
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty or only whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Shopify API secret key, used as the HMAC key for every
/// signature check.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ApiSecretKey(*****)` instead of the actual key. There is no `Display`
/// implementation, so the secret cannot end up in a formatted log line by accident.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::ApiSecretKey;
///
/// let secret = ApiSecretKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiSecretKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Creates a new validated API secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiSecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<[u8]> for ApiSecretKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecretKey(*****)")
    }
}

/// The hostname suffix under which merchant storefronts live.
///
/// Defaults to `myshopify.com`. Sibling platform environments (staging,
/// spin instances) can be targeted by constructing a different suffix.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::PlatformDomain;
///
/// assert_eq!(PlatformDomain::default().as_ref(), "myshopify.com");
///
/// let staging = PlatformDomain::new(".MyShopify.io").unwrap();
/// assert_eq!(staging.as_ref(), "myshopify.io");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlatformDomain(String);

impl PlatformDomain {
    /// The production storefront suffix.
    pub const DEFAULT: &'static str = "myshopify.com";

    /// Creates a validated platform suffix.
    ///
    /// Leading dots and surrounding whitespace are stripped and the value is
    /// lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPlatformDomain`] unless every dot-separated
    /// label is non-empty, made of ASCII letters, digits and hyphens, and does
    /// not start or end with a hyphen.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();
        let normalized = domain.trim().trim_start_matches('.').to_ascii_lowercase();

        let valid = !normalized.is_empty()
            && normalized.split('.').all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-')
            });

        if !valid {
            return Err(ConfigError::InvalidPlatformDomain { domain });
        }
        Ok(Self(normalized))
    }
}

impl Default for PlatformDomain {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl AsRef<str> for PlatformDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated Shopify shop domain.
///
/// Construction runs the same syntactic check as
/// [`is_syntactically_valid`](crate::auth::shop_domain::is_syntactically_valid):
/// a leading `http://`/`https://` and one trailing slash are tolerated, the
/// host is lowercased, and anything carrying a path, query, fragment or port is rejected.
///
/// # Serialization
///
/// `ShopDomain` serializes to and deserializes from the bare host string:
///
/// ```rust
/// use shopify_app_auth::ShopDomain;
///
/// let domain = ShopDomain::new("my-store.myshopify.com").unwrap();
/// let json = serde_json::to_string(&domain).unwrap();
/// assert_eq!(json, r#""my-store.myshopify.com""#);
/// ```
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::ShopDomain;
///
/// let domain = ShopDomain::new("https://My-Store.myshopify.com/").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), "my-store");
///
/// assert!(ShopDomain::new("my-store.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShopDomain {
    full_domain: String,
    shop_name_end: usize,
}

impl ShopDomain {
    /// Creates a shop domain under the default `myshopify.com` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl AsRef<str>) -> Result<Self, ConfigError> {
        Self::for_platform(domain, &PlatformDomain::default())
    }

    /// Creates a shop domain under a specific platform suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn for_platform(
        domain: impl AsRef<str>,
        platform: &PlatformDomain,
    ) -> Result<Self, ConfigError> {
        let domain = domain.as_ref();
        let full_domain =
            normalize_shop_host(domain, platform).ok_or_else(|| ConfigError::InvalidShopDomain {
                domain: domain.to_string(),
            })?;

        // normalize_shop_host guarantees the ".{platform}" suffix
        let shop_name_end = full_domain.len() - platform.as_ref().len() - 1;

        Ok(Self {
            full_domain,
            shop_name_end,
        })
    }

    /// Returns the shop name portion of the domain.
    ///
    /// For `my-store.myshopify.com`, this returns `my-store`.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.full_domain[..self.shop_name_end]
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_domain)
    }
}

impl Serialize for ShopDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full_domain)
    }
}

impl<'de> Deserialize<'de> for ShopDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
