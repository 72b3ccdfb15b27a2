// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default maximum concurrent connections per host
pub const DEFAULT_MAX_CONNS_PER_HOST: usize = 2000;

/// Default idle, lifetime and wait limit for pooled connections
pub const DEFAULT_MAX_CONN_TIMEOUT: Duration = Duration::from_secs(60);

/// Default read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default write timeout
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client configuration
///
/// Fixed once the client is built; every request uses the same limits.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum connections in use per host at any time
    pub max_conns_per_host: usize,
    /// Idle connections are closed after this long
    pub max_idle_conn_duration: Duration,
    /// Connections are retired after this long, idle or not
    pub max_conn_duration: Duration,
    /// How long a request may wait for a free connection slot
    pub max_conn_wait_timeout: Duration,
    /// Read timeout, reset after every successful read
    pub read_timeout: Duration,
    /// Timeout for establishing the connection and sending the request
    pub write_timeout: Duration,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Static host to address overrides used instead of DNS
    pub resolve: Vec<(String, SocketAddr)>,
    /// User agent string; `None` sends no User-Agent header
    pub user_agent: Option<String>,
    /// Maximum response body size in bytes; `None` is unlimited
    pub max_response_body_size: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_conns_per_host: DEFAULT_MAX_CONNS_PER_HOST,
            max_idle_conn_duration: DEFAULT_MAX_CONN_TIMEOUT,
            max_conn_duration: DEFAULT_MAX_CONN_TIMEOUT,
            max_conn_wait_timeout: DEFAULT_MAX_CONN_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            accept_invalid_certs: false,
            resolve: Vec::new(),
            user_agent: None,
            max_response_body_size: None,
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Legacy toolkit defaults, including disabled certificate verification
    pub fn legacy() -> Self {
        Self {
            accept_invalid_certs: true,
            ..Default::default()
        }
    }

    /// Set maximum connections per host
    pub fn max_conns_per_host(mut self, max: usize) -> Self {
        self.max_conns_per_host = max;
        self
    }

    /// Set idle connection lifetime
    pub fn max_idle_conn_duration(mut self, duration: Duration) -> Self {
        self.max_idle_conn_duration = duration;
        self
    }

    /// Set maximum connection lifetime
    pub fn max_conn_duration(mut self, duration: Duration) -> Self {
        self.max_conn_duration = duration;
        self
    }

    /// Set how long to wait for a free connection slot
    pub fn max_conn_wait_timeout(mut self, timeout: Duration) -> Self {
        self.max_conn_wait_timeout = timeout;
        self
    }

    /// Set read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set write timeout
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Skip TLS certificate verification
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Pin a host name to a socket address
    pub fn resolve(mut self, host: impl Into<String>, addr: SocketAddr) -> Self {
        self.resolve.push((host.into(), addr));
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Limit response body size
    pub fn max_response_body_size(mut self, limit: usize) -> Self {
        self.max_response_body_size = Some(limit);
        self
    }

    /// Reject limits that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.max_conns_per_host == 0 {
            return Err(Error::config("max_conns_per_host must be non-zero"));
        }

        let durations = [
            ("max_idle_conn_duration", self.max_idle_conn_duration),
            ("max_conn_duration", self.max_conn_duration),
            ("max_conn_wait_timeout", self.max_conn_wait_timeout),
            ("read_timeout", self.read_timeout),
            ("write_timeout", self.write_timeout),
        ];
        for (name, duration) in durations {
            if duration.is_zero() {
                return Err(Error::config(format!("{} must be non-zero", name)));
            }
        }

        if self.max_response_body_size == Some(0) {
            return Err(Error::config("max_response_body_size must be non-zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.max_conns_per_host, 2000);
        assert_eq!(config.max_idle_conn_duration, Duration::from_secs(60));
        assert_eq!(config.max_conn_duration, Duration::from_secs(60));
        assert_eq!(config.max_conn_wait_timeout, Duration::from_secs(60));
        assert_eq!(config.read_timeout, Duration::from_secs(10));
        assert_eq!(config.write_timeout, Duration::from_secs(10));
        assert!(!config.accept_invalid_certs);
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_legacy_is_insecure() {
        let config = ClientConfig::legacy();
        assert!(config.accept_invalid_certs);
        assert_eq!(config.max_conns_per_host, DEFAULT_MAX_CONNS_PER_HOST);
    }

    #[test]
    fn test_builder() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let config = ClientConfig::new()
            .max_conns_per_host(4)
            .read_timeout(Duration::from_secs(2))
            .resolve("api.internal", addr)
            .user_agent("pooled-http/0.1")
            .max_response_body_size(1024);

        assert_eq!(config.max_conns_per_host, 4);
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(config.resolve, vec![("api.internal".to_string(), addr)]);
        assert_eq!(config.user_agent.as_deref(), Some("pooled-http/0.1"));
        assert_eq!(config.max_response_body_size, Some(1024));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        assert!(ClientConfig::new().max_conns_per_host(0).validate().is_err());
        assert!(ClientConfig::new()
            .max_conn_wait_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::new()
            .max_response_body_size(0)
            .validate()
            .is_err());
    }
}
