// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie store replayed on every request

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single HTTP cookie
///
/// Only `name` and `value` are sent back to servers. The remaining
/// attributes are kept as parsed from `Set-Cookie` for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    /// Cookie sent with all requests
    #[default]
    None,
    /// Cookie sent with same-site and top-level navigations
    Lax,
    /// Cookie only sent with same-site requests
    Strict,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp < Utc::now())
    }

    /// Parse a Set-Cookie header value
    ///
    /// Returns `None` when the header has no `name=value` pair or the name
    /// is empty or contains separator characters.
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if !is_valid_name(name) {
            return None;
        }
        let value = value.trim().trim_matches('"');
        let mut cookie = Cookie::new(name, value);

        // Default domain to request host
        cookie.domain = url.host_str().unwrap_or("").to_string();

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let attr = attr.trim().to_lowercase();
                let val = val.trim();
                match attr.as_str() {
                    "domain" => cookie.domain = val.trim_start_matches('.').to_string(),
                    "path" => cookie.path = val.to_string(),
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                            cookie.expires = Some(dt.with_timezone(&Utc));
                        }
                    }
                    "max-age" => {
                        cookie.expires = val
                            .parse::<i64>()
                            .ok()
                            .and_then(chrono::Duration::try_seconds)
                            .and_then(|age| Utc::now().checked_add_signed(age))
                            .or(cookie.expires);
                    }
                    "samesite" => {
                        cookie.same_site = match val.to_lowercase().as_str() {
                            "strict" => SameSite::Strict,
                            "lax" => SameSite::Lax,
                            _ => SameSite::None,
                        };
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"'
                        | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
                )
        })
}

/// Ordered, append-only cookie storage shared by clones of a client
///
/// Cookies are never deduplicated in the store: setting the same name
/// twice keeps both entries. The `Cookie` request header sends each name
/// once, at its first position, with the most recent value.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    cookies: Arc<Mutex<Vec<Cookie>>>,
}

impl CookieStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cookie
    pub fn add(&self, cookie: Cookie) {
        self.cookies.lock().push(cookie);
    }

    /// Append several cookies under one lock
    pub fn extend(&self, cookies: impl IntoIterator<Item = Cookie>) {
        self.cookies.lock().extend(cookies);
    }

    /// Parse and append a Set-Cookie header, returning whether it was kept
    pub fn add_from_header(&self, header: &str, url: &Url) -> bool {
        match Cookie::parse(header, url) {
            Some(cookie) => {
                self.add(cookie);
                true
            }
            None => false,
        }
    }

    /// Snapshot of all cookies in insertion order
    pub fn all(&self) -> Vec<Cookie> {
        self.cookies.lock().clone()
    }

    /// Build the `Cookie` request header value
    ///
    /// Pairs that cannot be carried in a header value (control characters
    /// in the name or value) are left out; the rest are still sent.
    pub fn header_value(&self) -> Option<String> {
        let cookies = self.cookies.lock();

        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(cookies.len());
        for cookie in cookies.iter() {
            match pairs.iter_mut().find(|(name, _)| *name == cookie.name) {
                Some(pair) => pair.1 = cookie.value.as_str(),
                None => pairs.push((cookie.name.as_str(), cookie.value.as_str())),
            }
        }

        let rendered: Vec<String> = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .filter(|pair| {
                let ok = HeaderValue::from_str(pair).is_ok();
                if !ok {
                    tracing::warn!(cookie = ?pair, "Skipping cookie that is not a valid header value");
                }
                ok
            })
            .collect();

        if rendered.is_empty() {
            return None;
        }
        Some(rendered.join("; "))
    }

    /// Remove every cookie
    pub fn clear(&self) {
        self.cookies.lock().clear();
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.lock().len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.cookies.lock().is_empty()
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.cookies.lock())
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        Ok(Self {
            cookies: Arc::new(Mutex::new(cookies)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.com/path").unwrap()
    }

    #[test]
    fn test_cookie_parsing() {
        let header = "session=abc123; Domain=.example.com; Path=/app; Secure; HttpOnly; SameSite=Lax";
        let cookie = Cookie::parse(header, &url()).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/app");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, SameSite::Lax);
    }

    #[test]
    fn test_cookie_defaults_to_request_host() {
        let cookie = Cookie::parse("x=y", &url()).unwrap();
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert!(!cookie.is_expired());
    }

    #[test]
    fn test_cookie_negative_max_age_is_expired() {
        let cookie = Cookie::parse("x=y; Max-Age=-1", &url()).unwrap();
        assert!(cookie.is_expired());
    }

    #[test]
    fn test_malformed_cookies() {
        assert!(Cookie::parse("", &url()).is_none());
        assert!(Cookie::parse("novalue", &url()).is_none());
        assert!(Cookie::parse("=value", &url()).is_none());
        assert!(Cookie::parse("bad name=value", &url()).is_none());
    }

    #[test]
    fn test_store_appends_without_dedup() {
        let store = CookieStore::new();
        store.add(Cookie::new("a", "1"));
        assert!(store.add_from_header("a=2", &url()));
        assert!(!store.add_from_header("garbage", &url()));

        let all = store.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].value, "1");
        assert_eq!(all[1].value, "2");
    }

    #[test]
    fn test_header_value_last_write_wins() {
        let store = CookieStore::new();
        assert_eq!(store.header_value(), None);

        store.extend([
            Cookie::new("a", "1"),
            Cookie::new("b", "2"),
            Cookie::new("a", "3"),
        ]);
        assert_eq!(store.header_value().as_deref(), Some("a=3; b=2"));
    }

    #[test]
    fn test_header_value_skips_unencodable_pairs() {
        let store = CookieStore::new();
        store.extend([Cookie::new("good", "1"), Cookie::new("bad", "x\ny")]);
        assert_eq!(store.header_value().as_deref(), Some("good=1"));

        let only_bad = CookieStore::new();
        only_bad.add(Cookie::new("bad", "x\ry"));
        assert_eq!(only_bad.header_value(), None);
    }

    #[test]
    fn test_header_value_keeps_utf8_values() {
        let store = CookieStore::new();
        store.add(Cookie::new("city", "café"));
        assert_eq!(store.header_value().as_deref(), Some("city=café"));
    }

    #[test]
    fn test_clear_is_shared_between_clones() {
        let store = CookieStore::new();
        let clone = store.clone();
        store.add(Cookie::new("a", "1"));
        assert_eq!(clone.len(), 1);

        clone.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_export_import() {
        let store = CookieStore::new();
        store.add(Cookie::new("a", "1").domain("example.com"));
        store.add(Cookie::new("b", "2").path("/api"));

        let json = store.to_json().unwrap();
        let restored = CookieStore::from_json(&json).unwrap();
        assert_eq!(restored.all(), store.all());
    }
}
