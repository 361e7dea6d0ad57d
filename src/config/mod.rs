//! Configuration types for request authentication.
//!
//! # Overview
//!
//! - [`AuthConfig`]: an app's credentials and platform settings
//! - [`AuthConfigBuilder`]: a builder for constructing [`AuthConfig`] instances
//! - [`ApiKey`]: a validated API key newtype
//! - [`ApiSecretKey`]: a validated API secret key newtype with masked debug output
//! - [`PlatformDomain`]: the storefront hostname suffix (`myshopify.com` by default)
//! - [`ShopDomain`]: a validated Shopify shop domain
//!
//! Nothing here is global. A process serving several apps builds one
//! `AuthConfig` per app and passes it explicitly.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::{AuthConfig, ApiKey, ApiSecretKey};
//!
//! let config = AuthConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.platform_domain().as_ref(), "myshopify.com");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ApiSecretKey, PlatformDomain, ShopDomain};

use crate::auth::shop_domain::{DnsResolver, ShopDomainValidator};
use crate::error::ConfigError;
use std::time::Duration;

/// Default upper bound on a single shop domain resolution attempt.
pub const DEFAULT_RESOLUTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Credentials and platform settings for one app.
///
/// # Thread Safety
///
/// `AuthConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Key Rotation
///
/// The `old_api_secret_key` field supports seamless key rotation. When
/// validating HMAC signatures through [`verify_with_config`](crate::auth::hmac::verify_with_config),
/// the primary key is tried first, then the old key if configured.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    old_api_secret_key: Option<ApiSecretKey>,
    platform_domain: PlatformDomain,
    resolution_timeout: Duration,
}

impl AuthConfig {
    /// Creates a new builder for constructing an `AuthConfig`.
    #[must_use]
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the old API secret key, if configured.
    #[must_use]
    pub const fn old_api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.old_api_secret_key.as_ref()
    }

    /// Returns the storefront hostname suffix.
    #[must_use]
    pub const fn platform_domain(&self) -> &PlatformDomain {
        &self.platform_domain
    }

    /// Returns the bound applied to each shop domain resolution.
    #[must_use]
    pub const fn resolution_timeout(&self) -> Duration {
        self.resolution_timeout
    }

    /// Returns the secrets to try, primary first.
    pub(crate) fn secrets(&self) -> impl Iterator<Item = &ApiSecretKey> {
        std::iter::once(&self.api_secret_key).chain(self.old_api_secret_key.as_ref())
    }

    /// Returns a DNS-backed shop domain validator using this config's
    /// platform suffix and resolution timeout.
    #[must_use]
    pub fn shop_domain_validator(&self) -> ShopDomainValidator<DnsResolver> {
        ShopDomainValidator::new()
            .with_platform(self.platform_domain.clone())
            .with_timeout(self.resolution_timeout)
    }
}

// Verify AuthConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthConfig>();
};

/// Builder for constructing [`AuthConfig`] instances.
///
/// Required fields are `api_key` and `api_secret_key`.
///
/// # Defaults
///
/// - `old_api_secret_key`: `None`
/// - `platform_domain`: `myshopify.com`
/// - `resolution_timeout`: [`DEFAULT_RESOLUTION_TIMEOUT`]
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopify_app_auth::{AuthConfig, ApiKey, ApiSecretKey, PlatformDomain};
///
/// let config = AuthConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .api_secret_key(ApiSecretKey::new("new-secret").unwrap())
///     .old_api_secret_key(ApiSecretKey::new("old-secret").unwrap())
///     .platform_domain(PlatformDomain::new("myshopify.io").unwrap())
///     .resolution_timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.resolution_timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Default)]
pub struct AuthConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    old_api_secret_key: Option<ApiSecretKey>,
    platform_domain: Option<PlatformDomain>,
    resolution_timeout: Option<Duration>,
}

impl AuthConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the previous API secret key, accepted as a fallback while
    /// signatures made with it are still in flight.
    #[must_use]
    pub fn old_api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.old_api_secret_key = Some(key);
        self
    }

    /// Sets the storefront hostname suffix.
    #[must_use]
    pub fn platform_domain(mut self, domain: PlatformDomain) -> Self {
        self.platform_domain = Some(domain);
        self
    }

    /// Sets the bound applied to each shop domain resolution.
    #[must_use]
    pub const fn resolution_timeout(mut self, timeout: Duration) -> Self {
        self.resolution_timeout = Some(timeout);
        self
    }

    /// Builds the [`AuthConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `api_secret_key` are not set.
    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;

        Ok(AuthConfig {
            api_key,
            api_secret_key,
            old_api_secret_key: self.old_api_secret_key,
            platform_domain: self.platform_domain.unwrap_or_default(),
            resolution_timeout: self
                .resolution_timeout
                .unwrap_or(DEFAULT_RESOLUTION_TIMEOUT),
        })
    }
}
