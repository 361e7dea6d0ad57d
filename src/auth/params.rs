//! Captured request parameters.
//!
//! [`RequestParameters`] is the snapshot every signature check operates on.
//! It maps a parameter name to one or more values, keeps keys case-sensitive,
//! and orders them by byte value so that canonicalization never depends on
//! the order in which a web framework happened to hand the parameters over.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// An immutable set of query-string or form parameters.
///
/// Keys are ordered by ordinal byte comparison. Values for a repeated key are
/// kept in the order they were received.
///
/// # Example
///
/// ```rust
/// use shopify_app_auth::auth::RequestParameters;
///
/// let params = RequestParameters::from_query("?shop=a.myshopify.com&ids=1&ids=2");
/// assert_eq!(params.first("shop"), Some("a.myshopify.com"));
/// assert_eq!(params.get("ids"), Some(&["1".to_string(), "2".to_string()][..]));
///
/// let same: RequestParameters = [("ids", "1"), ("shop", "a.myshopify.com"), ("ids", "2")]
///     .into_iter()
///     .collect();
/// assert_eq!(params, same);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestParameters {
    entries: BTreeMap<String, Vec<String>>,
}

impl RequestParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored, `+` decodes to a space and percent escapes are
    /// decoded. Sequences that do not decode to UTF-8 are kept verbatim.
    /// A pair without `=` is captured with an empty value.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }

    /// Returns every value captured for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Returns the first value captured for `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns `true` if `key` was captured.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates keys in ordinal order together with their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(Cow::into_owned);
    decoded.unwrap_or(spaced)
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in iter {
            entries.entry(key.into()).or_default().push(value.into());
        }
        Self { entries }
    }
}

impl From<BTreeMap<String, Vec<String>>> for RequestParameters {
    fn from(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }
}

impl From<HashMap<String, Vec<String>>> for RequestParameters {
    fn from(entries: HashMap<String, Vec<String>>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl From<HashMap<String, String>> for RequestParameters {
    fn from(entries: HashMap<String, String>) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_decodes_components() {
        let params = RequestParameters::from_query(
            "path_prefix=%2Fapps%2Freviews&greeting=hello+world&shop=a.myshopify.com",
        );

        assert_eq!(params.first("path_prefix"), Some("/apps/reviews"));
        assert_eq!(params.first("greeting"), Some("hello world"));
        assert_eq!(params.first("shop"), Some("a.myshopify.com"));
    }

    #[test]
    fn test_from_query_collects_repeated_keys_in_order() {
        let params = RequestParameters::from_query("extra=2&extra=1&other=x");
        assert_eq!(
            params.get("extra"),
            Some(&["2".to_string(), "1".to_string()][..])
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_from_query_handles_bare_keys_and_empty_pairs() {
        let params = RequestParameters::from_query("?flag&&a=");
        assert_eq!(params.first("flag"), Some(""));
        assert_eq!(params.first("a"), Some(""));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_from_query_keeps_undecodable_sequences() {
        let params = RequestParameters::from_query("bad=%FF%FE");
        assert_eq!(params.first("bad"), Some("%FF%FE"));
    }

    #[test]
    fn test_empty_query_is_empty() {
        assert!(RequestParameters::from_query("").is_empty());
        assert!(RequestParameters::from_query("?").is_empty());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let params: RequestParameters = [("Shop", "a"), ("shop", "b")].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.first("Shop"), Some("a"));
        assert_eq!(params.first("shop"), Some("b"));
    }

    #[test]
    fn test_iteration_is_ordinal() {
        let params: RequestParameters = [("b", "1"), ("a", "2"), ("B", "3"), ("_", "4")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = params.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["B", "_", "a", "b"]);
    }

    #[test]
    fn test_from_hash_maps() {
        let mut single = HashMap::new();
        single.insert("shop".to_string(), "a.myshopify.com".to_string());
        let params = RequestParameters::from(single);
        assert!(params.contains_key("shop"));

        let mut multi = HashMap::new();
        multi.insert("ids".to_string(), vec!["1".to_string(), "2".to_string()]);
        let params = RequestParameters::from(multi);
        assert_eq!(params.get("ids").map(<[String]>::len), Some(2));
    }
}
