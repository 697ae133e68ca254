// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP server using the Tokio runtime.
//!
//! # Architecture
//!
//! The server binds one socket when it is built and keeps it for its whole lifetime.
//! Datagrams are processed on a single async task, one at a time: receive, stamp T2,
//! build the reply, stamp T3, send. A failed or rejected request is logged and the loop
//! moves on to the next datagram.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! use sntp_server::server::SntpServer;
//!
//! let server = SntpServer::builder()
//!     .listen("0.0.0.0:1123")
//!     .stratum(sntp_server::protocol::Stratum(2))
//!     .build()
//!     .await?;
//!
//! server.run().await
//! # }
//! ```

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use sntp_proto::clock::{SystemClock, TimeSource};
use sntp_proto::protocol::{self, PORT};
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ServerError};
use crate::multicast::{MulticastConfig, bind_listener};
use crate::server_common::{
    HandleResult, ServerMetrics, ServerState, handle_request, serialize_response_with_t3,
};

const RECV_BUF_LEN: usize = 2048;

/// Builder for configuring and creating an [`SntpServer`].
pub struct SntpServerBuilder {
    listen_addr: String,
    state: ServerState,
    clock: Arc<dyn TimeSource>,
    metrics: Option<Arc<ServerMetrics>>,
    multicast: Option<MulticastConfig>,
}

impl Default for SntpServerBuilder {
    fn default() -> Self {
        SntpServerBuilder {
            listen_addr: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, PORT).to_string(),
            state: ServerState::default(),
            clock: Arc::new(SystemClock),
            metrics: None,
            multicast: None,
        }
    }
}

impl SntpServerBuilder {
    /// Create a builder with default settings: `0.0.0.0:1123`, stratum 1, system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address (`host:port`; must resolve to IPv4).
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Set the stratum claimed in replies.
    pub fn stratum(mut self, stratum: protocol::Stratum) -> Self {
        self.state.stratum = stratum;
        self
    }

    /// Set the leap indicator carried in replies.
    pub fn leap_indicator(mut self, li: protocol::LeapIndicator) -> Self {
        self.state.leap_indicator = li;
        self
    }

    /// Set the precision exponent carried in replies.
    pub fn precision(mut self, precision: i8) -> Self {
        self.state.precision = precision;
        self
    }

    /// Set the reference identifier carried in replies.
    pub fn reference_id(mut self, reference_id: protocol::ReferenceIdentifier) -> Self {
        self.state.reference_id = reference_id;
        self
    }

    /// Read T2 and T3 from `clock` instead of the system clock.
    pub fn clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Attach metrics counters.
    pub fn metrics(mut self, metrics: Arc<ServerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Join an IPv4 multicast group on the default interface.
    pub fn join_multicast(mut self, group: Ipv4Addr) -> Self {
        self.multicast = Some(MulticastConfig::new(group));
        self
    }

    /// Build the server. Binds to the configured listen address.
    pub async fn build(self) -> io::Result<SntpServer> {
        let listen = resolve_listen(&self.listen_addr).await?;

        if let Some(config) = &self.multicast
            && !config.group.is_multicast()
        {
            return Err(ServerError::from(ConfigError::NotMulticast {
                group: config.group.to_string(),
            })
            .into());
        }

        let std_sock = bind_listener(listen, self.multicast.as_ref())?;
        let sock = UdpSocket::from_std(std_sock)?;
        info!(local = %sock.local_addr()?, "SNTP server listening");
        if let Some(config) = &self.multicast {
            info!(group = %config.group, "joined multicast group");
        }

        Ok(SntpServer {
            sock,
            state: self.state,
            clock: self.clock,
            metrics: self.metrics,
        })
    }
}

async fn resolve_listen(addr: &str) -> Result<SocketAddr, ServerError> {
    let invalid = |detail: String| {
        ServerError::Config(ConfigError::InvalidListenAddress {
            address: addr.to_owned(),
            detail,
        })
    };
    let mut addrs = tokio::net::lookup_host(addr)
        .await
        .map_err(|e| invalid(e.to_string()))?;
    addrs
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| invalid("no IPv4 address".to_owned()))
}

/// An SNTP server that answers client requests.
///
/// Created via [`SntpServer::builder()`]. Call [`run()`](SntpServer::run) to start
/// serving requests.
pub struct SntpServer {
    sock: UdpSocket,
    state: ServerState,
    clock: Arc<dyn TimeSource>,
    metrics: Option<Arc<ServerMetrics>>,
}

impl SntpServer {
    /// Create a builder for configuring the server.
    pub fn builder() -> SntpServerBuilder {
        SntpServerBuilder::new()
    }

    /// The fields stamped into every reply.
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Get the attached metrics instance, if any.
    pub fn metrics(&self) -> Option<&Arc<ServerMetrics>> {
        self.metrics.as_ref()
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Run the server, answering requests indefinitely.
    ///
    /// Invalid requests and failed sends are logged and skipped. The future only
    /// resolves on a receive error that leaves the socket unusable. Use `tokio::select!`
    /// or a shutdown signal to stop the server gracefully.
    pub async fn run(self) -> io::Result<()> {
        let mut recv_buf = [0u8; RECV_BUF_LEN];

        loop {
            let (recv_len, src_addr) = match self.sock.recv_from(&mut recv_buf).await {
                Ok(received) => received,
                Err(e) if is_transient(&e) => {
                    warn!("receive failed, continuing: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let result = handle_request(
                &recv_buf[..recv_len],
                src_addr,
                &self.state,
                self.clock.as_ref(),
                self.metrics.as_deref(),
            );

            match result {
                HandleResult::Response(reply) => {
                    let t3 = self.clock.now_timestamp();
                    let resp_buf = serialize_response_with_t3(&reply, t3);
                    match self.sock.send_to(&resp_buf, src_addr).await {
                        Ok(_) => {
                            debug!(%src_addr, transmit = %t3, "reply sent");
                            if let Some(m) = &self.metrics {
                                m.inc_responses_sent();
                            }
                        }
                        Err(e) => {
                            warn!(%src_addr, "send failed: {e}");
                            if let Some(m) = &self.metrics {
                                m.inc_send_errors();
                            }
                        }
                    }
                }
                HandleResult::Drop(reason) => {
                    warn!(%src_addr, "dropped request: {reason}");
                }
            }
        }
    }
}

// ICMP errors from earlier sends surface on the next receive on some platforms.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
    )
}
