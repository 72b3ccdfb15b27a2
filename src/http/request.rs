// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Set a header, replacing any previous value
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.set_header(name.as_ref(), value.as_ref())?;
        Ok(self)
    }

    /// Set a header in place
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let header_name =
            HeaderName::try_from(name).map_err(|e| Error::invalid_header(name, e))?;
        let header_value =
            HeaderValue::try_from(value).map_err(|e| Error::invalid_header(name, e))?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set JSON body and content type
    pub fn json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(Bytes::from(json));
        Ok(self)
    }

    /// Pool key for this request: `host:port`, default port filled in
    pub fn host_key(&self) -> String {
        host_key(&self.url)
    }
}

/// Pool key for a URL: `host:port`, default port filled in
pub fn host_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port_or_known_default() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://example.com/search?q=test").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.path(), "/search");
        assert!(req.body.is_none());
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(Request::get("not a url"), Err(Error::Url(_))));
    }

    #[test]
    fn test_headers() {
        let req = Request::get("https://example.com")
            .unwrap()
            .header("X-Custom", "value")
            .unwrap()
            .header("x-custom", "replaced")
            .unwrap();
        assert_eq!(req.headers.get("x-custom").unwrap(), "replaced");
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_invalid_header_name() {
        let result = Request::get("https://example.com")
            .unwrap()
            .header("bad header", "value");
        assert!(matches!(result, Err(Error::InvalidHeader { .. })));
    }

    #[test]
    fn test_json_body() {
        let req = Request::post("https://example.com/api")
            .unwrap()
            .json(&serde_json::json!({"key": "value"}))
            .unwrap();

        assert_eq!(req.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(req.body.as_deref(), Some(&b"{\"key\":\"value\"}"[..]));
    }

    #[test]
    fn test_host_key() {
        let req = Request::get("https://example.com/a").unwrap();
        assert_eq!(req.host_key(), "example.com:443");

        let req = Request::get("http://127.0.0.1:8080/a").unwrap();
        assert_eq!(req.host_key(), "127.0.0.1:8080");
    }
}
