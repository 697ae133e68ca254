// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async query using the Tokio runtime.
//!
//! Same exchange and retry policy as the blocking [`query`](crate::query), over
//! [`tokio::net::UdpSocket`]. Each attempt's receives share one deadline enforced with
//! [`tokio::time::timeout_at`] and backoff uses [`tokio::time::sleep`], so no runtime
//! thread is ever blocked.
//!
//! # Runtime Requirements
//!
//! These functions must be called from within a Tokio runtime context.
//! The library does **not** create a runtime; you must provide one.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! let config = sntp_client::ClientConfig::default();
//! let result = sntp_client::async_sntp::query(&config).await?;
//! println!("Clock is off by {} seconds", result.clock_offset);
//! # Ok(())
//! # }
//! ```

use log::{debug, warn};
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

use sntp_proto::clock::{SystemClock, TimeSource};

use crate::config::ClientConfig;
use crate::error::{ProtocolError, ResolveError, SntpError, TimeoutError};
use crate::exchange::{Exchange, ExchangeResult};
use crate::request::{deadline_passed, first_ipv4, socket_options};
use crate::socket_opts::ensure_nonzero_timeout;

const RECV_BUF_LEN: usize = 1024;

/// Query the configured destination asynchronously.
///
/// Resolution uses [`tokio::net::lookup_host`]. Errors are the same as for the blocking
/// [`query`](crate::query).
pub async fn query(config: &ClientConfig) -> io::Result<ExchangeResult> {
    ensure_nonzero_timeout(config.timeout).map_err(SntpError::Setup)?;
    let target = resolve(&config.destination).await?;
    let std_socket = socket_options(config, true)
        .bind_udp(&target)
        .map_err(SntpError::Setup)?;
    let socket = UdpSocket::from_std(std_socket).map_err(SntpError::Setup)?;
    debug!("{:?}", socket.local_addr());
    query_on(&socket, target, &SystemClock, config).await
}

/// Run the retry loop on an already-bound Tokio socket.
pub async fn query_on<C: TimeSource + ?Sized>(
    socket: &UdpSocket,
    target: SocketAddr,
    clock: &C,
    config: &ClientConfig,
) -> io::Result<ExchangeResult> {
    let attempts = config.attempts();
    let mut last_rejection = None;
    for attempt in 1..=attempts {
        match attempt_once(socket, target, clock, config, &mut last_rejection).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() => {
                warn!("attempt {attempt}/{attempts} to {target} failed: {e}");
                if attempt < attempts {
                    tokio::time::sleep(config.backoff_for(attempt)).await;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(SntpError::Timeout(TimeoutError {
        attempts,
        per_attempt: config.timeout,
        last_rejection,
    })
    .into())
}

async fn resolve(destination: &str) -> Result<SocketAddr, SntpError> {
    let addrs = tokio::net::lookup_host(destination).await.map_err(|e| {
        SntpError::Resolve(ResolveError {
            address: destination.to_owned(),
            source: Some(e),
        })
    })?;
    first_ipv4(addrs, destination)
}

async fn attempt_once<C: TimeSource + ?Sized>(
    socket: &UdpSocket,
    target: SocketAddr,
    clock: &C,
    config: &ClientConfig,
    last_rejection: &mut Option<ProtocolError>,
) -> Result<ExchangeResult, SntpError> {
    let mut exchange = Exchange::new();
    let wire = exchange.prepare_request(target, clock)?;
    let sent = socket
        .send_to(&wire, target)
        .await
        .map_err(SntpError::Transport)?;
    exchange.mark_sent()?;
    debug!("sent: {sent}");

    let deadline = tokio::time::Instant::now() + config.timeout;
    let mut buf = [0u8; RECV_BUF_LEN];
    loop {
        let (len, source) = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf))
            .await
            .map_err(|_| deadline_passed())?
            .map_err(SntpError::Transport)?;
        let t4 = clock.now_timestamp();
        debug!("recv: {len} bytes from {source}");

        match exchange.accept_reply(&buf[..len], source, t4) {
            Ok(_) => return exchange.compute_offset(),
            Err(SntpError::Protocol(rejection)) if rejection.is_stray_reply() => {
                debug!("discarding reply: {rejection}");
                *last_rejection = Some(rejection);
            }
            Err(e) => return Err(e),
        }
    }
}
