// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! A pooled HTTP client with per-host connection limits, default headers
//! and a cookie store that is replayed on every request.

mod client;
mod config;
mod cookie;
mod pool;
mod query;
mod request;
mod response;
mod transport;

pub use client::PooledHttpClient;
pub use config::{
    ClientConfig, DEFAULT_MAX_CONNS_PER_HOST, DEFAULT_MAX_CONN_TIMEOUT, DEFAULT_READ_TIMEOUT,
    DEFAULT_WRITE_TIMEOUT,
};
pub use cookie::{Cookie, CookieStore, SameSite};
pub use pool::{HostPool, HostStats, Lease};
pub use query::{append_query, encode_query, RAW_KEY_PREFIX};
pub use request::{host_key, Request};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

/// Common HTTP headers
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
}
