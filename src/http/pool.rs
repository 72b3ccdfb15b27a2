// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-host connection slot pool
//!
//! Every request holds a [`Lease`] on its destination host while it is on
//! the wire, which caps concurrent connections per host at
//! `max_conns_per_host`. Requests beyond the cap wait up to
//! `max_conn_wait_timeout` for a slot to free up.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::config::ClientConfig;
use crate::error::{Error, Result};

/// Per-host pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Total slots handed out
    pub acquired: u64,
    /// Total slots returned
    pub released: u64,
    /// Slots currently in use
    pub active: u64,
    /// Highest number of slots in use at once
    pub peak_active: u64,
    /// Acquisitions that gave up waiting
    pub timeouts: u64,
    /// Total time spent waiting for slots (ms)
    pub total_wait_ms: u64,
}

struct HostSlots {
    semaphore: Arc<Semaphore>,
    stats: RwLock<HostStats>,
    last_used: Mutex<Instant>,
}

impl HostSlots {
    fn new(max_conns: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_conns)),
            stats: RwLock::new(HostStats::default()),
            last_used: Mutex::new(Instant::now()),
        }
    }
}

/// A connection slot held for the duration of one request
///
/// The slot goes back to the pool when the lease is dropped, on every
/// exit path.
pub struct Lease {
    slots: Arc<HostSlots>,
    host: String,
    _permit: OwnedSemaphorePermit,
}

impl Lease {
    /// Host this lease belongs to
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        {
            let mut stats = self.slots.stats.write();
            stats.released += 1;
            stats.active = stats.active.saturating_sub(1);
        }
        *self.slots.last_used.lock() = Instant::now();
    }
}

/// Map from host to a bounded set of connection slots
pub struct HostPool {
    hosts: DashMap<String, Arc<HostSlots>>,
    max_conns_per_host: usize,
    max_idle: Duration,
    wait_timeout: Duration,
}

impl HostPool {
    /// Create a pool using the limits from `config`
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            hosts: DashMap::new(),
            max_conns_per_host: config.max_conns_per_host,
            max_idle: config.max_idle_conn_duration,
            wait_timeout: config.max_conn_wait_timeout,
        }
    }

    /// Acquire a slot for `host`, waiting at most the configured timeout
    pub async fn acquire(&self, host: &str) -> Result<Lease> {
        self.sweep_idle();

        let slots = Arc::clone(
            self.hosts
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(HostSlots::new(self.max_conns_per_host)))
                .value(),
        );

        let start = Instant::now();
        let acquired =
            tokio::time::timeout(self.wait_timeout, slots.semaphore.clone().acquire_owned()).await;
        let waited_ms = start.elapsed().as_millis() as u64;

        let permit = match acquired {
            Ok(Ok(permit)) => permit,
            // The semaphore is never closed, so only the timeout lands here
            _ => {
                let mut stats = slots.stats.write();
                stats.timeouts += 1;
                stats.total_wait_ms += waited_ms;
                tracing::debug!(host, waited_ms, "Timed out waiting for connection slot");
                return Err(Error::PoolTimeout {
                    host: host.to_string(),
                    waited_ms,
                });
            }
        };

        {
            let mut stats = slots.stats.write();
            stats.acquired += 1;
            stats.active += 1;
            stats.total_wait_ms += waited_ms;
            if stats.active > stats.peak_active {
                stats.peak_active = stats.active;
            }
        }
        *slots.last_used.lock() = Instant::now();

        tracing::trace!(host, waited_ms, "Acquired connection slot");

        Ok(Lease {
            slots,
            host: host.to_string(),
            _permit: permit,
        })
    }

    /// Drop hosts that have been unused for longer than the idle limit
    ///
    /// A host is only evicted when nothing outside the map references it,
    /// so in-flight requests and waiters keep their slots. Returns the
    /// number of hosts removed.
    pub fn sweep_idle(&self) -> usize {
        let before = self.hosts.len();
        self.hosts.retain(|_, slots| {
            Arc::strong_count(slots) > 1 || slots.last_used.lock().elapsed() < self.max_idle
        });
        let removed = before.saturating_sub(self.hosts.len());
        if removed > 0 {
            tracing::debug!(removed, "Evicted idle hosts from pool");
        }
        removed
    }

    /// Get statistics for one host
    pub fn stats(&self, host: &str) -> Option<HostStats> {
        self.hosts.get(host).map(|slots| slots.stats.read().clone())
    }

    /// Get statistics for every tracked host, sorted by host
    pub fn all_stats(&self) -> Vec<(String, HostStats)> {
        let mut all: Vec<_> = self
            .hosts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().stats.read().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Number of hosts currently tracked
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Free slots for a host (the full limit for untracked hosts)
    pub fn available_slots(&self, host: &str) -> usize {
        self.hosts
            .get(host)
            .map(|slots| slots.semaphore.available_permits())
            .unwrap_or(self.max_conns_per_host)
    }

    /// Maximum slots per host
    pub fn max_conns_per_host(&self) -> usize {
        self.max_conns_per_host
    }
}
