// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # pooled-http - Pooled HTTP client with persistent state
//!
//! A thin layer over reqwest for talking to a handful of hosts many times
//! over, keeping session state between calls.
//!
//! ## Features
//!
//! - Per-host connection limits with bounded wait and per-host statistics
//! - Default headers attached to every request
//! - Cookie store fed by `Set-Cookie` responses and replayed on every request
//! - GET parameters as a query string, with a raw-passthrough key prefix
//! - POST parameters as a JSON body
//! - Pluggable transport for testing and custom engines
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use pooled_http::{ClientConfig, PooledHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PooledHttpClient::with_config(ClientConfig::new().max_conns_per_host(64))?;
//!     client.set_headers([("accept", "application/json")]);
//!     client.set_cookies([("session", "abc123")]);
//!
//!     let body = client.get("https://example.com/search", [("q", "rust pools")]).await?;
//!     println!("{}", String::from_utf8_lossy(&body));
//!
//!     let mut params = HashMap::new();
//!     params.insert("name", serde_json::json!("widget"));
//!     client.post("https://example.com/items", &params).await?;
//!
//!     for cookie in client.cookies() {
//!         println!("{}={}", cookie.name, cookie.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

// Re-exports for convenience

// Client
pub use http::{ClientConfig, PooledHttpClient};

// Cookies
pub use http::{Cookie, CookieStore, SameSite};

// Pool and transport
pub use http::{HostPool, HostStats, ReqwestTransport, Transport};

// Requests and responses
pub use http::{encode_query, Request, Response, RAW_KEY_PREFIX};

// Errors
pub use error::{Error, Result};

/// pooled-http version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
