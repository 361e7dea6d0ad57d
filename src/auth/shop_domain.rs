//! Shop domain validation.
//!
//! Two levels of checking are offered:
//!
//! - [`is_syntactically_valid`] is pure and synchronous. It accepts
//!   `name.myshopify.com` (case-insensitive), tolerating a leading
//!   `http://`/`https://` and one trailing slash, and rejects anything with a
//!   path, query, fragment, port or credentials.
//! - [`ShopDomainValidator::is_valid_shop_domain`] runs the syntactic check
//!   first and only then resolves the host, bounded by a timeout. Failures,
//!   timeouts and malformed input all collapse to `false`.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::is_syntactically_valid;
//!
//! assert!(is_syntactically_valid("shop.myshopify.com"));
//! assert!(is_syntactically_valid("https://shop.myshopify.com/"));
//! assert!(!is_syntactically_valid("notshopify.com"));
//! assert!(!is_syntactically_valid("shop.myshopify.com/extra"));
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};

use crate::config::{PlatformDomain, DEFAULT_RESOLUTION_TIMEOUT};

/// Returns `true` if `candidate` is a well-formed `*.myshopify.com` host.
#[must_use]
pub fn is_syntactically_valid(candidate: &str) -> bool {
    normalize_shop_host(candidate, &PlatformDomain::default()).is_some()
}

/// Returns `true` if `candidate` is a well-formed host under `platform`.
#[must_use]
pub fn is_syntactically_valid_for(candidate: &str, platform: &PlatformDomain) -> bool {
    normalize_shop_host(candidate, platform).is_some()
}

/// Reduces `candidate` to a bare lowercase shop host, or `None` if it is not
/// one label followed by `.{platform}`.
pub(crate) fn normalize_shop_host(candidate: &str, platform: &PlatformDomain) -> Option<String> {
    let trimmed = candidate.trim();
    let without_scheme = strip_scheme(trimmed);
    let host = without_scheme.strip_suffix('/').unwrap_or(without_scheme);

    let host = host.to_ascii_lowercase();
    let label = host
        .strip_suffix(platform.as_ref())
        .and_then(|rest| rest.strip_suffix('.'))?;

    let mut chars = label.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '-');

    (first_ok && rest_ok).then_some(host)
}

fn strip_scheme(value: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if let Some(prefix) = value.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                return &value[scheme.len()..];
            }
        }
    }
    value
}

/// Name resolution used by [`ShopDomainValidator`].
///
/// Implementations answer whether `host` resolves to at least one address.
/// They need not bound their own latency; the validator applies the timeout.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Returns `true` if `host` resolves.
    async fn resolve(&self, host: &str) -> bool;
}

/// Resolves hosts through the system resolver via Tokio.
#[derive(Clone, Copy, Debug, Default)]
pub struct DnsResolver;

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, host: &str) -> bool {
        match tokio::net::lookup_host((host, 443)).await {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(error) => {
                tracing::debug!(host, %error, "shop domain resolution failed");
                false
            }
        }
    }
}

/// Validates shop domains, optionally confirming that they resolve.
///
/// # Cancellation
///
/// Every resolution is bounded by [`timeout`](Self::timeout). Callers that
/// own a wider deadline can use
/// [`is_valid_shop_domain_until`](Self::is_valid_shop_domain_until), and
/// dropping the returned future abandons the lookup.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopify_app_auth::auth::ShopDomainValidator;
///
/// # tokio_test::block_on(async {
/// let validator = ShopDomainValidator::new().with_timeout(Duration::from_millis(200));
///
/// // Rejected without touching the network.
/// assert!(!validator.is_valid_shop_domain("https://google.com").await);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct ShopDomainValidator<R = DnsResolver> {
    platform: PlatformDomain,
    timeout: Duration,
    resolver: R,
}

impl ShopDomainValidator<DnsResolver> {
    /// Creates a DNS-backed validator for `myshopify.com` with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(DnsResolver)
    }
}

impl Default for ShopDomainValidator<DnsResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HostResolver> ShopDomainValidator<R> {
    /// Creates a validator backed by a custom resolver.
    #[must_use]
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            platform: PlatformDomain::default(),
            timeout: DEFAULT_RESOLUTION_TIMEOUT,
            resolver,
        }
    }

    /// Targets a different platform suffix.
    #[must_use]
    pub fn with_platform(mut self, platform: PlatformDomain) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the bound applied to each resolution.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the bound applied to each resolution.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the platform suffix this validator accepts.
    #[must_use]
    pub const fn platform(&self) -> &PlatformDomain {
        &self.platform
    }

    /// Runs only the syntactic check.
    #[must_use]
    pub fn is_syntactically_valid(&self, candidate: &str) -> bool {
        is_syntactically_valid_for(candidate, &self.platform)
    }

    /// Returns `true` if `candidate` is well-formed and resolves within the timeout.
    pub async fn is_valid_shop_domain(&self, candidate: &str) -> bool {
        let Some(host) = normalize_shop_host(candidate, &self.platform) else {
            return false;
        };

        if let Ok(resolved) = timeout(self.timeout, self.resolver.resolve(&host)).await {
            resolved
        } else {
            tracing::debug!(host = %host, timeout = ?self.timeout, "shop domain resolution timed out");
            false
        }
    }

    /// Like [`is_valid_shop_domain`](Self::is_valid_shop_domain), but gives up
    /// at `deadline` or after the configured timeout, whichever comes first.
    pub async fn is_valid_shop_domain_until(&self, candidate: &str, deadline: Instant) -> bool {
        // A timeout too large to add to now leaves the caller's deadline in charge.
        let deadline = Instant::now()
            .checked_add(self.timeout)
            .map_or(deadline, |bounded| deadline.min(bounded));

        let Some(host) = normalize_shop_host(candidate, &self.platform) else {
            return false;
        };

        if let Ok(resolved) = timeout_at(deadline, self.resolver.resolve(&host)).await {
            resolved
        } else {
            tracing::debug!(host = %host, "shop domain resolution passed its deadline");
            false
        }
    }
}

/// Checks `candidate` against `myshopify.com` and resolves it through DNS,
/// giving up after `resolution_timeout`.
pub async fn is_valid_shop_domain(candidate: &str, resolution_timeout: Duration) -> bool {
    ShopDomainValidator::new()
        .with_timeout(resolution_timeout)
        .is_valid_shop_domain(candidate)
        .await
}
