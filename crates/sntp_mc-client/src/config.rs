// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Client configuration: where to send, how long to wait, how often to retry.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use sntp_proto::protocol::{MULTICAST_GROUP, PORT};

/// Default per-attempt receive timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(250);

/// Upper bound for the doubling retry delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Settings for a single clock-offset query.
///
/// Defaults reproduce the classic multicast client: one request to `224.0.0.1:1123`.
/// Unlike that client, a missing reply does not block forever; each attempt waits at
/// most `timeout`, and up to `retries` further attempts follow with doubling backoff.
///
/// ```
/// use std::time::Duration;
/// use sntp_client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .destination("127.0.0.1:1123")
///     .timeout(Duration::from_secs(1))
///     .retries(0);
/// assert_eq!(config.destination, "127.0.0.1:1123");
/// assert_eq!(config.attempts(), 1);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    /// Destination `host:port`; a multicast group or a unicast server.
    pub destination: String,
    /// Local address to bind.
    pub bind: SocketAddr,
    /// Per-attempt receive timeout.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub retries: u32,
    /// Delay before the first retry; doubles for every further retry up to [`MAX_BACKOFF`].
    pub backoff: Duration,
    /// TTL for multicast requests.
    pub multicast_ttl: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            destination: SocketAddrV4::new(MULTICAST_GROUP, PORT).to_string(),
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
            multicast_ttl: 1,
        }
    }
}

impl ClientConfig {
    /// Set the destination `host:port`.
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Set the local bind address.
    pub fn bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Set the per-attempt receive timeout. Queries refuse zero.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries after the first attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the delay before the first retry.
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the multicast TTL.
    pub fn multicast_ttl(mut self, ttl: u32) -> Self {
        self.multicast_ttl = ttl;
        self
    }

    /// Total number of requests a query may send.
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-based) before the next one.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.backoff
            .checked_mul(1 << shift)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}
