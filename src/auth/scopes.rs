//! OAuth scope handling for Shopify API.
//!
//! Scopes enter the crate either as raw strings or as [`AuthScope`] values.
//! Both paths end in the same normalization function, so the authorization
//! URL only ever sees canonical lowercase snake-case tokens.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! auth_scopes {
    ($($variant:ident => $token:literal,)+) => {
        /// A well-known Shopify access scope.
        ///
        /// Use [`AuthScope::as_str`] for the wire token. Scopes not listed here
        /// can still be requested as raw strings through [`AuthScopes`].
        ///
        /// # Example
        ///
        /// ```rust
        /// use shopify_app_auth::AuthScope;
        ///
        /// assert_eq!(AuthScope::ReadCustomers.as_str(), "read_customers");
        /// assert_eq!("write_orders".parse::<AuthScope>().unwrap(), AuthScope::WriteOrders);
        /// ```
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum AuthScope {
            $(
                #[doc = concat!("`", $token, "`")]
                $variant,
            )+
        }

        impl AuthScope {
            /// Every known scope, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the canonical wire token for this scope.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }
    };
}

auth_scopes! {
    ReadAnalytics => "read_analytics",
    ReadAssignedFulfillmentOrders => "read_assigned_fulfillment_orders",
    WriteAssignedFulfillmentOrders => "write_assigned_fulfillment_orders",
    ReadCheckouts => "read_checkouts",
    WriteCheckouts => "write_checkouts",
    ReadContent => "read_content",
    WriteContent => "write_content",
    ReadCustomers => "read_customers",
    WriteCustomers => "write_customers",
    ReadDiscounts => "read_discounts",
    WriteDiscounts => "write_discounts",
    ReadDraftOrders => "read_draft_orders",
    WriteDraftOrders => "write_draft_orders",
    ReadFulfillments => "read_fulfillments",
    WriteFulfillments => "write_fulfillments",
    ReadGiftCards => "read_gift_cards",
    WriteGiftCards => "write_gift_cards",
    ReadInventory => "read_inventory",
    WriteInventory => "write_inventory",
    ReadLocales => "read_locales",
    WriteLocales => "write_locales",
    ReadLocations => "read_locations",
    ReadMarketingEvents => "read_marketing_events",
    WriteMarketingEvents => "write_marketing_events",
    ReadOrders => "read_orders",
    WriteOrders => "write_orders",
    ReadAllOrders => "read_all_orders",
    ReadPriceRules => "read_price_rules",
    WritePriceRules => "write_price_rules",
    ReadProductListings => "read_product_listings",
    ReadProducts => "read_products",
    WriteProducts => "write_products",
    ReadReports => "read_reports",
    WriteReports => "write_reports",
    ReadResourceFeedbacks => "read_resource_feedbacks",
    WriteResourceFeedbacks => "write_resource_feedbacks",
    ReadScriptTags => "read_script_tags",
    WriteScriptTags => "write_script_tags",
    ReadShipping => "read_shipping",
    WriteShipping => "write_shipping",
    ReadThemes => "read_themes",
    WriteThemes => "write_themes",
    ReadUsers => "read_users",
    WriteUsers => "write_users",
    UnauthenticatedReadProductListings => "unauthenticated_read_product_listings",
    UnauthenticatedReadContent => "unauthenticated_read_content",
    UnauthenticatedWriteCheckouts => "unauthenticated_write_checkouts",
    UnauthenticatedWriteCustomers => "unauthenticated_write_customers",
}

impl AsRef<str> for AuthScope {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_scope(s)?;
        Self::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str() == token)
            .ok_or_else(|| ConfigError::InvalidScopes {
                reason: format!("Unknown scope: '{s}'"),
            })
    }
}

impl Serialize for AuthScope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuthScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Normalizes one scope to its canonical lowercase snake-case token.
///
/// Surrounding whitespace is trimmed, `-` and inner whitespace become `_`,
/// and `camelCase`/`PascalCase` word boundaries gain an `_`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidScopes`] if the scope is empty or contains
/// characters other than ASCII letters, digits, `_`, `-` and spaces.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::auth::normalize_scope;
///
/// assert_eq!(normalize_scope(" ReadCustomers ").unwrap(), "read_customers");
/// assert_eq!(normalize_scope("write-draft-orders").unwrap(), "write_draft_orders");
/// assert!(normalize_scope("read:orders").is_err());
/// ```
pub fn normalize_scope(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidScopes {
            reason: "Scope cannot be empty".to_string(),
        });
    }

    let mut token = String::with_capacity(trimmed.len() + 4);
    let mut previous: Option<char> = None;
    for c in trimmed.chars() {
        match c {
            'A'..='Z' => {
                if previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                    token.push('_');
                }
                token.push(c.to_ascii_lowercase());
            }
            'a'..='z' | '0'..='9' | '_' => token.push(c),
            '-' | ' ' | '\t' => token.push('_'),
            _ => {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("Invalid characters in scope: '{trimmed}'"),
                });
            }
        }
        previous = Some(c);
    }

    Ok(token)
}

/// An ordered set of OAuth scopes.
///
/// Scopes are normalized on insertion and kept in first-seen order with
/// duplicates dropped, which is exactly the order they are requested in.
///
/// # Implied Scopes
///
/// Shopify treats `write_foo` as granting `read_foo` (and
/// `unauthenticated_write_foo` as granting `unauthenticated_read_foo`).
/// [`AuthScopes::covers`] honours that; the set itself never adds implied
/// scopes, so a request asks for exactly what the caller listed.
///
/// # Serialization
///
/// `AuthScopes` serializes to and deserializes from a comma-separated string.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::{AuthScope, AuthScopes};
///
/// let scopes: AuthScopes = "read_customers, write_customers, read_customers".parse().unwrap();
/// assert_eq!(scopes.to_string(), "read_customers,write_customers");
///
/// let typed = AuthScopes::from_iter([AuthScope::ReadCustomers, AuthScope::WriteCustomers]);
/// assert_eq!(scopes, typed);
///
/// let required: AuthScopes = "read_customers".parse().unwrap();
/// assert!(scopes.covers(&required));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthScopes {
    scopes: Vec<String>,
}

impl AuthScopes {
    /// Creates an empty scope set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scope set from raw scope strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidScopes`] if any scope fails
    /// [`normalize_scope`].
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scopes = Self::new();
        for token in tokens {
            scopes.insert_token(normalize_scope(token.as_ref())?);
        }
        Ok(scopes)
    }

    /// Adds a known scope, keeping first-seen order.
    pub fn insert(&mut self, scope: AuthScope) {
        self.insert_token(scope.as_str().to_string());
    }

    fn insert_token(&mut self, token: String) {
        if !self.scopes.contains(&token) {
            self.scopes.push(token);
        }
    }

    /// Returns `true` if the scope set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns the number of distinct scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns an iterator over the scopes in request order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    /// Returns `true` if this scope set grants every scope in `other`,
    /// counting implied read scopes.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        other.iter().all(|required| {
            self.iter()
                .any(|granted| granted == required || implied_scope(granted).as_deref() == Some(required))
        })
    }
}

fn implied_scope(scope: &str) -> Option<String> {
    scope
        .strip_prefix("unauthenticated_write_")
        .map(|rest| format!("unauthenticated_read_{rest}"))
        .or_else(|| {
            scope
                .strip_prefix("write_")
                .map(|rest| format!("read_{rest}"))
        })
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tokens(s.split(',').filter(|scope| !scope.trim().is_empty()))
    }
}

impl FromIterator<AuthScope> for AuthScopes {
    fn from_iter<I: IntoIterator<Item = AuthScope>>(iter: I) -> Self {
        let mut scopes = Self::new();
        for scope in iter {
            scopes.insert(scope);
        }
        scopes
    }
}

impl From<AuthScope> for AuthScopes {
    fn from(scope: AuthScope) -> Self {
        std::iter::once(scope).collect()
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scopes.join(","))
    }
}

impl Serialize for AuthScopes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AuthScopes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
