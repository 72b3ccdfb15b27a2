// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Query string encoding for GET parameters
//!
//! Values are form-urlencoded (`a b&c` becomes `a+b%26c`). A key that starts
//! with [`RAW_KEY_PREFIX`] opts out: the prefix is removed from the key and
//! the value is copied into the query string exactly as given. This exists
//! for callers that already hold pre-encoded values, and it is easy to
//! misuse: a raw value containing `&` or `=` will split the parameter.

use url::form_urlencoded::byte_serialize;

/// Key prefix that disables value escaping
pub const RAW_KEY_PREFIX: &str = "__";

/// Encode parameters as `k1=v1&k2=v2`
///
/// Pairs are emitted in iteration order, keys are never escaped, and an
/// empty input yields an empty string.
pub fn encode_query<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut query = String::new();

    for (key, value) in params {
        let (key, value) = (key.as_ref(), value.as_ref());

        if !query.is_empty() {
            query.push('&');
        }

        match key.strip_prefix(RAW_KEY_PREFIX) {
            Some(raw_key) => {
                query.push_str(raw_key);
                query.push('=');
                query.push_str(value);
            }
            None => {
                query.push_str(key);
                query.push('=');
                query.extend(byte_serialize(value.as_bytes()));
            }
        }
    }

    query
}

/// Append an encoded query to a URL
///
/// An empty query leaves the URL untouched. A URL that already carries a
/// query string is extended with `&`.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_escapes_values() {
        let query = encode_query([("q", "a b&c"), ("lang", "fi")]);
        assert_eq!(query, "q=a+b%26c&lang=fi");
    }

    #[test]
    fn test_each_key_once_no_trailing_ampersand() {
        let mut params = HashMap::new();
        params.insert("alpha", "1");
        params.insert("beta", "two words");
        params.insert("gamma", "x=y");

        let query = encode_query(&params);
        assert!(!query.ends_with('&'));

        let parts: Vec<&str> = query.split('&').collect();
        assert_eq!(parts.len(), 3);
        for key in ["alpha", "beta", "gamma"] {
            let prefix = format!("{}=", key);
            assert_eq!(parts.iter().filter(|p| p.starts_with(&prefix)).count(), 1);
        }
        assert!(parts.contains(&"beta=two+words"));
        assert!(parts.contains(&"gamma=x%3Dy"));
    }

    #[test]
    fn test_raw_prefix_passthrough() {
        let query = encode_query([("__sig", "a%2Fb c"), ("name", "a b")]);
        assert_eq!(query, "sig=a%2Fb c&name=a+b");
    }

    #[test]
    fn test_short_and_bare_prefix_keys() {
        assert_eq!(encode_query([("a", "1")]), "a=1");
        assert_eq!(encode_query([("_", "1")]), "_=1");
        assert_eq!(encode_query([("__", "x y")]), "=x y");
    }

    #[test]
    fn test_empty_params() {
        let params: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(encode_query(&params), "");
    }

    #[test]
    fn test_btreemap_order_is_deterministic() {
        let mut params = BTreeMap::new();
        params.insert("b".to_string(), "2".to_string());
        params.insert("a".to_string(), "1".to_string());
        assert_eq!(encode_query(&params), "a=1&b=2");
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("http://h/p", ""), "http://h/p");
        assert_eq!(append_query("http://h/p", "a=1"), "http://h/p?a=1");
        assert_eq!(append_query("http://h/p?x=0", "a=1"), "http://h/p?x=0&a=1");
    }
}
