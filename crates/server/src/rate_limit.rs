//! Per-client rate limiting for the public capture form
//!
//! Fixed window counters keyed by client IP. The key is the socket peer
//! unless the peer is a configured trusted proxy, in which case the first
//! `X-Forwarded-For` hop is used. Counters are best-effort: two requests
//! racing at a window boundary may both be admitted.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};
use thiserror::Error;

use leaddesk_config::RateLimitConfig;

/// Windows kept before stale entries are swept
const SWEEP_THRESHOLD: usize = 10_000;

/// Rejected request
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Rate limit exceeded, retry after {retry_after_secs}s")]
pub struct RateLimitError {
    pub retry_after_secs: u64,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

struct Windows {
    by_client: HashMap<IpAddr, Window>,
    last_sweep: Option<Instant>,
}

/// Fixed window limiter
pub struct RateLimiter {
    enabled: bool,
    max_requests: u32,
    window: Duration,
    trusted_proxies: Vec<IpAddr>,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_requests: config.max_requests.max(1),
            window: Duration::from_secs(config.window_seconds.max(1)),
            trusted_proxies: config.trusted_proxies.clone(),
            windows: Mutex::new(Windows {
                by_client: HashMap::new(),
                last_sweep: None,
            }),
        }
    }

    /// Client a request is counted against
    ///
    /// `X-Forwarded-For` is only read when the socket peer is a trusted proxy.
    pub fn client_key(&self, peer: Option<IpAddr>, forwarded_for: Option<&str>) -> IpAddr {
        let peer = peer.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        if !self.trusted_proxies.contains(&peer) {
            return peer;
        }
        forwarded_for
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(peer)
    }

    /// Admit or reject one request from `ip`
    pub fn check(&self, ip: IpAddr) -> Result<(), RateLimitError> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), RateLimitError> {
        if !self.enabled {
            return Ok(());
        }

        let mut windows = self.windows.lock();
        let sweep_due = windows
            .last_sweep
            .map_or(true, |at| now.duration_since(at) >= self.window);
        if windows.by_client.len() > SWEEP_THRESHOLD && sweep_due {
            let window = self.window;
            windows
                .by_client
                .retain(|_, w| now.duration_since(w.started) < window);
            windows.last_sweep = Some(now);
        }

        let entry = windows.by_client.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            let remaining = self.window.saturating_sub(now.duration_since(entry.started));
            return Err(RateLimitError {
                retry_after_secs: remaining.as_secs().max(1),
            });
        }

        entry.count += 1;
        Ok(())
    }

    /// Clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().by_client.len()
    }
}
