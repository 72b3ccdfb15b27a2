// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pooled HTTP client implementation

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::header::HeaderValue;
use serde::Serialize;

use super::config::ClientConfig;
use super::cookie::{Cookie, CookieStore};
use super::pool::{HostPool, HostStats};
use super::query::{append_query, encode_query};
use super::request::Request;
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use super::headers;
use crate::error::Result;

/// HTTP client with per-host connection limits and persistent
/// header/cookie state
///
/// Default headers and stored cookies are attached to every request until
/// they are replaced or cleared. Cookies from `Set-Cookie` response headers
/// are appended to the store after each exchange. Clones share the pool,
/// headers and cookies.
///
/// Header and cookie state is lock-protected, so concurrent requests and
/// mutations are safe. Each request sees the state as it was when the
/// request was built; ordering between concurrent calls is up to the caller.
#[derive(Clone)]
pub struct PooledHttpClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    pool: Arc<HostPool>,
    headers: Arc<RwLock<HashMap<String, String>>>,
    cookies: CookieStore,
}

impl PooledHttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.clone())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`
    ///
    /// The pool limits from `config` still apply.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for this client");
        }

        Ok(Self {
            pool: Arc::new(HostPool::new(&config)),
            config: Arc::new(config),
            transport,
            headers: Arc::new(RwLock::new(HashMap::new())),
            cookies: CookieStore::new(),
        })
    }

    /// Replace the default headers sent with every request
    pub fn set_headers<I, K, V>(&self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        *self.headers.write() = headers;
    }

    /// Current default headers
    pub fn headers(&self) -> HashMap<String, String> {
        self.headers.read().clone()
    }

    /// Append one cookie per name/value pair to the store
    pub fn set_cookies<I, K, V>(&self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.cookies
            .extend(values.into_iter().map(|(k, v)| Cookie::new(k, v)));
    }

    /// Remove every stored cookie
    pub fn clear_cookies(&self) {
        self.cookies.clear();
    }

    /// Snapshot of stored cookies in insertion order
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookies.all()
    }

    /// `Cookie` header value the next request will carry
    pub fn cookie_header(&self) -> Option<String> {
        self.cookies.header_value()
    }

    /// Get the cookie store
    pub fn cookie_store(&self) -> &CookieStore {
        &self.cookies
    }

    /// Send a GET request and return the response body
    ///
    /// `params` are encoded into the query string (see
    /// [`encode_query`](crate::http::encode_query) for the raw-passthrough
    /// key prefix). No `?` is added when `params` is empty.
    pub async fn get<I, K, V>(&self, url: &str, params: I) -> Result<Bytes>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let target = append_query(url, &encode_query(params));
        let response = self.execute(Request::get(target)?).await?;
        Ok(response.into_body())
    }

    /// Send a POST request with `params` as a JSON body and return the
    /// response body
    ///
    /// Fails with [`Error::Serialization`](crate::Error::Serialization)
    /// before any network I/O if `params` cannot be encoded.
    pub async fn post<T: Serialize + ?Sized>(&self, url: &str, params: &T) -> Result<Bytes> {
        let request = Request::post(url)?.json(params)?;
        let response = self.execute(request).await?;
        Ok(response.into_body())
    }

    /// Execute a request
    ///
    /// Default headers are added where the request does not already set
    /// them, followed by the stored cookies. Non-2xx responses are returned,
    /// not treated as errors.
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        self.attach_state(&mut request);

        let host = request.host_key();
        let method = request.method.clone();
        let url = request.url.clone();
        tracing::debug!(%method, %url, "Sending request");

        let result = {
            let _lease = self.pool.acquire(&host).await?;
            self.transport.round_trip(request).await
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%method, %url, error = %err, "Request failed");
                return Err(err);
            }
        };

        self.harvest_cookies(&response);

        tracing::debug!(
            %method,
            %url,
            status = response.status_code(),
            elapsed_ms = response.response_time_ms,
            "Received response"
        );

        Ok(response)
    }

    /// Pool statistics for a `host:port` key
    pub fn pool_stats(&self, host: &str) -> Option<HostStats> {
        self.pool.stats(host)
    }

    /// Pool statistics for every tracked host
    pub fn pool_stats_all(&self) -> Vec<(String, HostStats)> {
        self.pool.all_stats()
    }

    /// Get client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn attach_state(&self, request: &mut Request) {
        for (name, value) in self.headers.read().iter() {
            if request.headers.contains_key(name.as_str()) {
                continue;
            }
            if let Err(err) = request.set_header(name, value) {
                tracing::warn!(error = %err, "Skipping default header");
            }
        }

        if let Some(cookie_header) = self.cookies.header_value() {
            match HeaderValue::try_from(cookie_header) {
                Ok(value) => {
                    request.headers.insert(headers::COOKIE, value);
                }
                Err(err) => tracing::warn!(error = %err, "Skipping unencodable cookie header"),
            }
        }
    }

    fn harvest_cookies(&self, response: &Response) {
        let mut parsed = Vec::new();
        for raw in response.headers.get_all(headers::SET_COOKIE) {
            match Cookie::parse(&String::from_utf8_lossy(raw.as_bytes()), &response.url) {
                Some(cookie) => parsed.push(cookie),
                None => tracing::debug!(header = ?raw, "Dropping malformed Set-Cookie header"),
            }
        }

        if !parsed.is_empty() {
            tracing::trace!(count = parsed.len(), "Stored response cookies");
            self.cookies.extend(parsed);
        }
    }
}
