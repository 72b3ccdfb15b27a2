// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam between the client and the HTTP engine

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use reqwest::redirect::Policy;
use url::Url;

use super::config::ClientConfig;
use super::request::Request;
use super::response::Response;
use crate::error::{Error, Result};

/// Executes a single request/response exchange
///
/// Implementations must be safe to share between tasks. The client never
/// calls `round_trip` without first holding a pool slot for the request's
/// host.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the full response
    async fn round_trip(&self, request: Request) -> Result<Response>;
}

struct HostClient {
    client: reqwest::Client,
    created: Instant,
    last_used: Instant,
}

impl HostClient {
    fn is_live(&self, config: &ClientConfig) -> bool {
        self.created.elapsed() < config.max_conn_duration
            && self.last_used.elapsed() < config.max_idle_conn_duration
    }
}

/// Transport backed by one reqwest client per host
///
/// Each host client keeps its own keep-alive connections. Once a host client
/// is older than `max_conn_duration` or unused for `max_idle_conn_duration`
/// it is dropped from the map, which retires its sockets as soon as
/// in-flight requests finish.
pub struct ReqwestTransport {
    config: ClientConfig,
    clients: DashMap<String, HostClient>,
}

impl ReqwestTransport {
    /// Create a transport for the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Surface TLS backend and builder errors at construction time
        build_client(&config)?;

        Ok(Self {
            config,
            clients: DashMap::new(),
        })
    }

    /// Number of live host clients
    pub fn host_count(&self) -> usize {
        self.clients.len()
    }

    /// Drop host clients past their lifetime or idle limit
    ///
    /// Returns the number of host clients removed.
    pub fn sweep_expired(&self) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, entry| entry.is_live(&self.config));
        let removed = before.saturating_sub(self.clients.len());
        if removed > 0 {
            tracing::debug!(removed, "Closed expired host clients");
        }
        removed
    }

    fn client_for(&self, host: &str) -> Result<reqwest::Client> {
        self.sweep_expired();

        if let Some(mut entry) = self.clients.get_mut(host) {
            entry.last_used = Instant::now();
            return Ok(entry.client.clone());
        }

        let client = build_client(&self.config)?;
        let now = Instant::now();
        self.clients.insert(
            host.to_string(),
            HostClient {
                client: client.clone(),
                created: now,
                last_used: now,
            },
        );
        tracing::debug!(host, "Opened host client");
        Ok(client)
    }

    fn map_error(&self, err: reqwest::Error, url: &Url) -> Error {
        if err.is_connect() {
            if err.is_timeout() {
                return Error::timeout_with_url(
                    "connect",
                    millis(self.config.write_timeout),
                    url.as_str(),
                );
            }
            return Error::connect(url.as_str(), &err);
        }
        if err.is_timeout() {
            return Error::timeout_with_url(
                "read",
                millis(self.config.read_timeout),
                url.as_str(),
            );
        }
        Error::Http(err)
    }

    async fn read_body(&self, response: &mut reqwest::Response, url: &Url) -> Result<Bytes> {
        let limit = self.config.max_response_body_size;

        if let (Some(limit), Some(len)) = (limit, response.content_length()) {
            if len > limit as u64 {
                return Err(Error::BodyTooLarge {
                    url: url.to_string(),
                    limit,
                });
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e, url))? {
            if let Some(limit) = limit {
                if body.len() + chunk.len() > limit {
                    return Err(Error::BodyTooLarge {
                        url: url.to_string(),
                        limit,
                    });
                }
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn round_trip(&self, request: Request) -> Result<Response> {
        let start = Instant::now();
        let client = self.client_for(&request.host_key())?;
        let url = request.url.clone();

        let mut builder = client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // Header phase is bounded by write + read timeouts combined
        let header_deadline = self.config.write_timeout + self.config.read_timeout;
        let mut response = match tokio::time::timeout(header_deadline, builder.send()).await {
            Ok(sent) => sent.map_err(|e| self.map_error(e, &url))?,
            Err(_) => {
                return Err(Error::timeout_with_url(
                    "request",
                    millis(header_deadline),
                    url.as_str(),
                ))
            }
        };
        let status = response.status();
        let headers = response.headers().clone();
        let body = self.read_body(&mut response, &url).await?;

        Ok(Response::new(
            status,
            headers,
            body,
            url,
            start.elapsed().as_millis() as u64,
        ))
    }
}

fn build_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(config.max_conns_per_host)
        .pool_idle_timeout(config.max_idle_conn_duration)
        .read_timeout(config.read_timeout)
        .connect_timeout(config.write_timeout)
        .redirect(Policy::none())
        .danger_accept_invalid_certs(config.accept_invalid_certs);

    if let Some(ref user_agent) = config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    for (host, addr) in &config.resolve {
        builder = builder.resolve(host, *addr);
    }

    Ok(builder.build()?)
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(ClientConfig::default()).unwrap();
        assert_eq!(transport.host_count(), 0);
    }

    #[test]
    fn test_host_clients_are_reused() {
        let transport = ReqwestTransport::new(ClientConfig::default()).unwrap();
        transport.client_for("a:80").unwrap();
        transport.client_for("a:80").unwrap();
        transport.client_for("b:80").unwrap();
        assert_eq!(transport.host_count(), 2);
    }

    #[test]
    fn test_expired_host_client_is_replaced() {
        let config = ClientConfig::new().max_conn_duration(Duration::from_millis(1));
        let transport = ReqwestTransport::new(config).unwrap();

        transport.client_for("a:80").unwrap();
        let first = transport.clients.get("a:80").unwrap().created;
        std::thread::sleep(Duration::from_millis(5));
        transport.client_for("a:80").unwrap();
        let second = transport.clients.get("a:80").unwrap().created;

        assert!(second > first);
        assert_eq!(transport.host_count(), 1);
    }

    #[test]
    fn test_idle_host_clients_are_dropped() {
        let config = ClientConfig::new()
            .max_idle_conn_duration(Duration::from_millis(1))
            .max_conn_duration(Duration::from_millis(1));
        let transport = ReqwestTransport::new(config).unwrap();

        for i in 0..50 {
            transport.client_for(&format!("host{}:80", i)).unwrap();
        }
        std::thread::sleep(Duration::from_millis(20));
        transport.client_for("fresh:80").unwrap();

        assert_eq!(transport.host_count(), 1);
        assert!(transport.clients.contains_key("fresh:80"));
    }

    #[test]
    fn test_recently_used_host_client_survives_sweep() {
        let config = ClientConfig::new().max_idle_conn_duration(Duration::from_secs(60));
        let transport = ReqwestTransport::new(config).unwrap();

        transport.client_for("a:80").unwrap();
        assert_eq!(transport.sweep_expired(), 0);
        assert_eq!(transport.host_count(), 1);
    }
}
