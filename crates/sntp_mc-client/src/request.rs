// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Blocking one-shot query with bounded retries.
//!
//! Each attempt is a fresh [`Exchange`]: a new request with a new transmit timestamp,
//! so a late reply to an earlier attempt fails origin correlation instead of being
//! mistaken for the current one. Such replies are discarded and the attempt keeps
//! listening until its deadline; only the deadline ends an attempt.

use log::{debug, warn};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use sntp_proto::clock::{SystemClock, TimeSource};

use crate::config::ClientConfig;
use crate::error::{ProtocolError, ResolveError, SntpError, TimeoutError};
use crate::exchange::{Exchange, ExchangeResult};
use crate::socket_opts::SocketOptions;
use crate::transport::DatagramTransport;

/// Resolve `destination` to its first IPv4 socket address.
pub(crate) fn resolve_ipv4(destination: &str) -> Result<SocketAddr, SntpError> {
    let addrs = destination.to_socket_addrs().map_err(|e| {
        SntpError::Resolve(ResolveError {
            address: destination.to_owned(),
            source: Some(e),
        })
    })?;
    first_ipv4(addrs, destination)
}

pub(crate) fn first_ipv4(
    addrs: impl IntoIterator<Item = SocketAddr>,
    destination: &str,
) -> Result<SocketAddr, SntpError> {
    addrs.into_iter().find(SocketAddr::is_ipv4).ok_or_else(|| {
        SntpError::Resolve(ResolveError {
            address: destination.to_owned(),
            source: None,
        })
    })
}

pub(crate) fn socket_options(config: &ClientConfig, nonblocking: bool) -> SocketOptions {
    SocketOptions {
        bind: config.bind,
        multicast_ttl: config.multicast_ttl,
        timeout: (!nonblocking).then_some(config.timeout),
        nonblocking,
    }
}

/// Query the configured destination and compute the local clock offset.
///
/// Binds a fresh IPv4 UDP socket, sends one client request per attempt and returns the
/// first reply that echoes the request's transmit timestamp. With a multicast
/// destination the first answering server wins.
///
/// # Errors
///
/// Returns an `io::Error` wrapping an [`SntpError`]:
///
/// - `Resolve` if the destination has no IPv4 address
/// - `Setup` if the socket cannot be created or bound
/// - `Transport` if a send fails
/// - `Malformed` if a reply is not exactly 48 bytes
/// - `Timeout` if no acceptable reply arrives within `config.attempts()` attempts
///
/// # Examples
///
/// ```no_run
/// # fn main() -> std::io::Result<()> {
/// let result = sntp_client::query(&sntp_client::ClientConfig::default())?;
/// println!("Clock is off by {} seconds", result.clock_offset);
/// # Ok(())
/// # }
/// ```
pub fn query(config: &ClientConfig) -> io::Result<ExchangeResult> {
    let target = resolve_ipv4(&config.destination)?;
    let socket = socket_options(config, false)
        .bind_udp(&target)
        .map_err(SntpError::Setup)?;
    debug!("{:?}", socket.local_addr());
    query_with(&socket, target, &SystemClock, config)
}

/// Run the retry loop over an arbitrary transport and clock.
///
/// Before every receive the transport's read timeout is set to what is left of the
/// attempt's `config.timeout`.
pub fn query_with<T, C>(
    transport: &T,
    target: SocketAddr,
    clock: &C,
    config: &ClientConfig,
) -> io::Result<ExchangeResult>
where
    T: DatagramTransport + ?Sized,
    C: TimeSource + ?Sized,
{
    Ok(run_attempts(transport, target, clock, config)?)
}

fn run_attempts<T, C>(
    transport: &T,
    target: SocketAddr,
    clock: &C,
    config: &ClientConfig,
) -> Result<ExchangeResult, SntpError>
where
    T: DatagramTransport + ?Sized,
    C: TimeSource + ?Sized,
{
    let attempts = config.attempts();
    let mut last_rejection = None;
    for attempt in 1..=attempts {
        match attempt_once(transport, target, clock, config.timeout, &mut last_rejection) {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() => {
                warn!("attempt {attempt}/{attempts} to {target} failed: {e}");
                if attempt < attempts {
                    std::thread::sleep(config.backoff_for(attempt));
                }
            }
            Err(e) => return Err(e),
        }
    }
    Err(SntpError::Timeout(TimeoutError {
        attempts,
        per_attempt: config.timeout,
        last_rejection,
    }))
}

fn attempt_once<T, C>(
    transport: &T,
    target: SocketAddr,
    clock: &C,
    timeout: Duration,
    last_rejection: &mut Option<ProtocolError>,
) -> Result<ExchangeResult, SntpError>
where
    T: DatagramTransport + ?Sized,
    C: TimeSource + ?Sized,
{
    let mut exchange = Exchange::new();
    exchange.send_request(transport, target, clock)?;
    let deadline = std::time::Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(std::time::Instant::now());
        if remaining.is_zero() {
            return Err(deadline_passed());
        }
        transport
            .set_read_timeout(remaining)
            .map_err(SntpError::Transport)?;
        match exchange.await_reply(transport, clock) {
            Ok(_) => return exchange.compute_offset(),
            Err(SntpError::Protocol(rejection)) if rejection.is_stray_reply() => {
                debug!("discarding reply: {rejection}");
                *last_rejection = Some(rejection);
            }
            Err(e) => return Err(e),
        }
    }
}

pub(crate) fn deadline_passed() -> SntpError {
    SntpError::Transport(io::Error::new(
        io::ErrorKind::TimedOut,
        "no reply within timeout",
    ))
}
