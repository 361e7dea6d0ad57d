//! OAuth authorization URL generation.
//!
//! This module assembles the URL a merchant is redirected to when installing
//! an app:
//!
//! ```text
//! https://{shop}/admin/oauth/authorize?client_id=..&scope=..&redirect_uri=..[&state=..][&grant_options[]=..]
//! ```
//!
//! Parameters are always emitted in that order. Values are percent-encoded
//! with the RFC 3986 query character set, so characters such as `:`, `/` and
//! `,` stay literal while `&`, `=`, `+`, `#` and `%` are escaped.
//!
//! # Example
//!
//! ```rust
//! use shopify_app_auth::auth::oauth::build_authorization_url;
//!
//! let url = build_authorization_url(
//!     ["read_customers", "write_customers"],
//!     "shop.myshopify.com",
//!     "APIKEY",
//!     "http://example.com",
//!     None,
//!     None::<Vec<String>>,
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     url.as_str(),
//!     "https://shop.myshopify.com/admin/oauth/authorize\
//!      ?client_id=APIKEY&scope=read_customers,write_customers&redirect_uri=http://example.com",
//! );
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::auth::oauth::error::OAuthError;
use crate::auth::scopes::AuthScopes;
use crate::config::{ApiKey, AuthConfig, PlatformDomain, ShopDomain};

/// Grant option requesting an online, per-staff-member access token.
pub const PER_USER_GRANT: &str = "per-user";

/// Characters escaped in query values: everything outside the RFC 3986
/// `query` production, plus the form delimiters `&`, `=`, `+` and `'`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'@')
    .remove(b',')
    .remove(b'!')
    .remove(b'$')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b';');

/// Everything needed to produce one authorization URL.
///
/// An `AuthorizationUrlSpec` is validated when built and never changes
/// afterwards; [`url`](Self::url) always returns the same URL.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::auth::oauth::{AuthorizationUrlSpec, PER_USER_GRANT};
/// use shopify_app_auth::{ApiKey, AuthScope, ShopDomain};
///
/// let spec = AuthorizationUrlSpec::builder()
///     .api_key(ApiKey::new("APIKEY").unwrap())
///     .shop(ShopDomain::new("shop.myshopify.com").unwrap())
///     .scopes([AuthScope::ReadCustomers, AuthScope::WriteCustomers].into_iter().collect())
///     .redirect_uri("http://example.com")
///     .state("abc123")
///     .grant_option(PER_USER_GRANT)
///     .build()
///     .unwrap();
///
/// assert!(spec.url().as_str().ends_with("&state=abc123&grant_options[]=per-user"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationUrlSpec {
    api_key: ApiKey,
    shop: ShopDomain,
    scopes: AuthScopes,
    redirect_uri: String,
    state: Option<String>,
    grant_options: Vec<String>,
    url: Url,
}

impl AuthorizationUrlSpec {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> AuthorizationUrlSpecBuilder {
        AuthorizationUrlSpecBuilder::default()
    }

    /// Returns the API key sent as `client_id`.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the shop the merchant is sent to.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Returns the requested scopes in request order.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the redirect target.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the anti-forgery state, if one was supplied.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns the grant options in caller order.
    #[must_use]
    pub fn grant_options(&self) -> &[String] {
        &self.grant_options
    }

    /// Returns the authorization URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Consumes `self` and returns the authorization URL.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.url
    }
}

/// Builder for [`AuthorizationUrlSpec`].
///
/// `api_key`, `shop`, `scopes` and `redirect_uri` are required. An empty
/// `state` and an empty grant option list are treated as absent.
#[derive(Debug, Default)]
pub struct AuthorizationUrlSpecBuilder {
    api_key: Option<ApiKey>,
    shop: Option<ShopDomain>,
    scopes: Option<AuthScopes>,
    redirect_uri: Option<String>,
    state: Option<String>,
    grant_options: Vec<String>,
}

impl AuthorizationUrlSpecBuilder {
    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the shop (required).
    #[must_use]
    pub fn shop(mut self, shop: ShopDomain) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Sets the requested scopes (required, may be empty).
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the redirect target (required).
    #[must_use]
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the anti-forgery state.
    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Appends one grant option.
    #[must_use]
    pub fn grant_option(mut self, option: impl Into<String>) -> Self {
        self.grant_options.push(option.into());
        self
    }

    /// Appends several grant options, keeping their order.
    #[must_use]
    pub fn grant_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant_options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Validates the fields and produces the spec.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::MissingField`] if a required field was not set
    /// - [`OAuthError::EmptyRedirectUri`] if the redirect URI is blank
    /// - [`OAuthError::InvalidShopDomain`] if the shop host cannot form a URL
    pub fn build(self) -> Result<AuthorizationUrlSpec, OAuthError> {
        let api_key = self
            .api_key
            .ok_or(OAuthError::MissingField { field: "api_key" })?;
        let shop = self.shop.ok_or(OAuthError::MissingField { field: "shop" })?;
        let scopes = self
            .scopes
            .ok_or(OAuthError::MissingField { field: "scopes" })?;
        let redirect_uri = self
            .redirect_uri
            .ok_or(OAuthError::MissingField {
                field: "redirect_uri",
            })?;

        if redirect_uri.trim().is_empty() {
            return Err(OAuthError::EmptyRedirectUri);
        }

        let state = self.state.filter(|state| !state.is_empty());
        let grant_options: Vec<String> = self
            .grant_options
            .into_iter()
            .filter(|option| !option.is_empty())
            .collect();

        let mut query = vec![
            format!("client_id={}", encode(api_key.as_ref())),
            format!("scope={}", encode(&scopes.to_string())),
            format!("redirect_uri={}", encode(&redirect_uri)),
        ];
        if let Some(state) = &state {
            query.push(format!("state={}", encode(state)));
        }
        query.extend(
            grant_options
                .iter()
                .map(|option| format!("grant_options[]={}", encode(option))),
        );

        let mut url = Url::parse(&format!("https://{shop}/admin/oauth/authorize")).map_err(
            |_| OAuthError::InvalidShopDomain {
                domain: shop.to_string(),
            },
        )?;
        url.set_query(Some(&query.join("&")));

        Ok(AuthorizationUrlSpec {
            api_key,
            shop,
            scopes,
            redirect_uri,
            state,
            grant_options,
            url,
        })
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Builds an authorization URL from loosely typed inputs.
///
/// `scopes` are normalized, de-duplicated in first-seen order and joined with
/// commas. `shop` must be a `*.myshopify.com` host (a scheme and trailing slash
/// are tolerated). An empty `state` or empty `grant_options` are omitted.
///
/// # Errors
///
/// - [`OAuthError::InvalidShopDomain`] if `shop` is not a storefront host
/// - [`OAuthError::EmptyRedirectUri`] if `redirect_uri` is blank
/// - [`OAuthError::Config`] if `api_key` is empty or a scope is malformed
pub fn build_authorization_url<I, S, G, O>(
    scopes: I,
    shop: &str,
    api_key: &str,
    redirect_uri: &str,
    state: Option<&str>,
    grant_options: Option<G>,
) -> Result<Url, OAuthError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    G: IntoIterator<Item = O>,
    O: Into<String>,
{
    build_for_platform(
        &PlatformDomain::default(),
        scopes,
        shop,
        ApiKey::new(api_key)?,
        redirect_uri,
        state,
        grant_options,
    )
}

/// Builds an authorization URL using the API key and platform suffix from `config`.
///
/// # Errors
///
/// Same as [`build_authorization_url`].
pub fn build_authorization_url_with_config<I, S, G, O>(
    config: &AuthConfig,
    scopes: I,
    shop: &str,
    redirect_uri: &str,
    state: Option<&str>,
    grant_options: Option<G>,
) -> Result<Url, OAuthError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    G: IntoIterator<Item = O>,
    O: Into<String>,
{
    build_for_platform(
        config.platform_domain(),
        scopes,
        shop,
        config.api_key().clone(),
        redirect_uri,
        state,
        grant_options,
    )
}

fn build_for_platform<I, S, G, O>(
    platform: &PlatformDomain,
    scopes: I,
    shop: &str,
    api_key: ApiKey,
    redirect_uri: &str,
    state: Option<&str>,
    grant_options: Option<G>,
) -> Result<Url, OAuthError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    G: IntoIterator<Item = O>,
    O: Into<String>,
{
    let shop = ShopDomain::for_platform(shop, platform).map_err(|_| OAuthError::InvalidShopDomain {
        domain: shop.to_string(),
    })?;

    let mut builder = AuthorizationUrlSpec::builder()
        .api_key(api_key)
        .shop(shop)
        .scopes(AuthScopes::from_tokens(scopes)?)
        .redirect_uri(redirect_uri);
    if let Some(state) = state {
        builder = builder.state(state);
    }
    if let Some(options) = grant_options {
        builder = builder.grant_options(options);
    }

    Ok(builder.build()?.into_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::scopes::AuthScope;
    use crate::config::ApiSecretKey;
    use crate::error::ConfigError;

    const NO_GRANTS: Option<Vec<String>> = None;

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_minimal_url_is_pinned() {
        let url = build_authorization_url(
            ["read_customers", "write_customers"],
            "shop.myshopify.com",
            "APIKEY",
            "http://example.com",
            None,
            NO_GRANTS,
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://shop.myshopify.com/admin/oauth/authorize\
             ?client_id=APIKEY&scope=read_customers,write_customers&redirect_uri=http://example.com"
        );
        assert!(!url.as_str().contains("state="));
        assert!(!url.as_str().contains("grant_options"));
    }

    #[test]
    fn test_state_and_grants_are_appended_in_order() {
        let url = build_authorization_url(
            ["read_customers", "write_customers"],
            "shop.myshopify.com",
            "APIKEY",
            "http://example.com",
            Some("abc123"),
            Some([PER_USER_GRANT]),
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://shop.myshopify.com/admin/oauth/authorize\
             ?client_id=APIKEY&scope=read_customers,write_customers&redirect_uri=http://example.com\
             &state=abc123&grant_options[]=per-user"
        );
        assert_eq!(url.as_str().matches("grant_options[]=per-user").count(), 1);
    }

    #[test]
    fn test_multiple_grant_options_repeat_in_caller_order() {
        let url = build_authorization_url(
            ["read_orders"],
            "shop.myshopify.com",
            "APIKEY",
            "http://example.com",
            None,
            Some(vec!["per-user", "", "value"]),
        )
        .unwrap();

        let grants: Vec<String> = query_pairs(&url)
            .into_iter()
            .filter(|(k, _)| k == "grant_options[]")
            .map(|(_, v)| v)
            .collect();
        assert_eq!(grants, vec!["per-user", "value"]);
    }

    #[test]
    fn test_empty_state_and_grants_are_omitted() {
        let url = build_authorization_url(
            ["read_orders"],
            "shop.myshopify.com",
            "APIKEY",
            "http://example.com",
            Some(""),
            Some(Vec::<String>::new()),
        )
        .unwrap();

        assert!(!url.as_str().contains("state"));
        assert!(!url.as_str().contains("grant_options"));
    }

    #[test]
    fn test_duplicate_scopes_appear_once() {
        let url = build_authorization_url(
            ["read_customers", "read_customers", "ReadCustomers"],
            "shop.myshopify.com",
            "APIKEY",
            "http://example.com",
            None,
            NO_GRANTS,
        )
        .unwrap();

        assert!(url.as_str().contains("scope=read_customers&"));
        assert_eq!(url.as_str().matches("read_customers").count(), 1);
    }

    #[test]
    fn test_values_with_delimiters_are_escaped_and_round_trip() {
        let redirect = "https://app.example.com/auth/callback?next=/a b&x=1+2#frag";
        let url = build_authorization_url(
            ["read_orders"],
            "shop.myshopify.com",
            "key&id=1",
            redirect,
            Some("st=a&b"),
            NO_GRANTS,
        )
        .unwrap();

        assert!(url.as_str().contains("client_id=key%26id%3D1&"));
        assert!(url.as_str().contains("state=st%3Da%26b"));
        assert!(!url.as_str().contains('#'));

        let pairs = query_pairs(&url);
        assert_eq!(pairs[0], ("client_id".to_string(), "key&id=1".to_string()));
        assert_eq!(pairs[2], ("redirect_uri".to_string(), redirect.to_string()));
        assert_eq!(pairs[3], ("state".to_string(), "st=a&b".to_string()));
    }

    #[test]
    fn test_shop_with_scheme_and_slash_is_normalized() {
        let url = build_authorization_url(
            ["read_orders"],
            "https://Shop.myshopify.com/",
            "APIKEY",
            "http://example.com",
            None,
            NO_GRANTS,
        )
        .unwrap();

        assert_eq!(url.host_str(), Some("shop.myshopify.com"));
        assert_eq!(url.path(), "/admin/oauth/authorize");
    }

    #[test]
    fn test_invalid_shop_fails() {
        let result = build_authorization_url(
            ["read_orders"],
            "https://google.com",
            "APIKEY",
            "http://example.com",
            None,
            NO_GRANTS,
        );

        assert!(matches!(result, Err(OAuthError::InvalidShopDomain { domain }) if domain == "https://google.com"));
    }

    #[test]
    fn test_empty_redirect_uri_fails() {
        let result = build_authorization_url(
            ["read_orders"],
            "shop.myshopify.com",
            "APIKEY",
            "  ",
            None,
            NO_GRANTS,
        );
        assert_eq!(result, Err(OAuthError::EmptyRedirectUri));
    }

    #[test]
    fn test_empty_api_key_fails() {
        let result = build_authorization_url(
            ["read_orders"],
            "shop.myshopify.com",
            "",
            "http://example.com",
            None,
            NO_GRANTS,
        );
        assert_eq!(result, Err(OAuthError::Config(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_malformed_scope_fails() {
        let result = build_authorization_url(
            ["read_orders&admin=1"],
            "shop.myshopify.com",
            "APIKEY",
            "http://example.com",
            None,
            NO_GRANTS,
        );
        assert!(matches!(
            result,
            Err(OAuthError::Config(ConfigError::InvalidScopes { .. }))
        ));
    }

    #[test]
    fn test_builder_requires_fields() {
        let result = AuthorizationUrlSpec::builder()
            .shop(ShopDomain::new("shop.myshopify.com").unwrap())
            .scopes(AuthScopes::new())
            .redirect_uri("http://example.com")
            .build();
        assert_eq!(result, Err(OAuthError::MissingField { field: "api_key" }));
    }

    #[test]
    fn test_spec_exposes_its_fields() {
        let spec = AuthorizationUrlSpec::builder()
            .api_key(ApiKey::new("APIKEY").unwrap())
            .shop(ShopDomain::new("shop.myshopify.com").unwrap())
            .scopes(AuthScope::ReadProducts.into())
            .redirect_uri("http://example.com")
            .grant_options(["per-user"])
            .build()
            .unwrap();

        assert_eq!(spec.api_key().as_ref(), "APIKEY");
        assert_eq!(spec.shop().shop_name(), "shop");
        assert_eq!(spec.scopes().to_string(), "read_products");
        assert_eq!(spec.redirect_uri(), "http://example.com");
        assert_eq!(spec.state(), None);
        assert_eq!(spec.grant_options(), ["per-user".to_string()]);
        assert_eq!(spec.url().clone(), spec.clone().into_url());
    }

    #[test]
    fn test_with_config_uses_platform_and_key() {
        let config = AuthConfig::builder()
            .api_key(ApiKey::new("cfg-key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .platform_domain(PlatformDomain::new("shop.dev").unwrap())
            .build()
            .unwrap();

        let url = build_authorization_url_with_config(
            &config,
            ["read_orders"],
            "store.shop.dev",
            "http://example.com",
            None,
            NO_GRANTS,
        )
        .unwrap();

        assert!(url
            .as_str()
            .starts_with("https://store.shop.dev/admin/oauth/authorize?client_id=cfg-key&"));

        let rejected = build_authorization_url_with_config(
            &config,
            ["read_orders"],
            "store.myshopify.com",
            "http://example.com",
            None,
            NO_GRANTS,
        );
        assert!(matches!(rejected, Err(OAuthError::InvalidShopDomain { .. })));
    }
}
