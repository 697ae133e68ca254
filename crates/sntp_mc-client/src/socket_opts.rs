// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! UDP socket creation with multicast and timeout options via `socket2`.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

/// Socket options applied when creating the client socket.
#[derive(Clone, Debug)]
pub(crate) struct SocketOptions {
    /// Local address to bind.
    pub bind: SocketAddr,
    /// TTL for multicast requests; 1 keeps them on the local subnet.
    pub multicast_ttl: u32,
    /// Read and write timeout, for blocking sockets.
    pub timeout: Option<Duration>,
    /// Put the socket in non-blocking mode (for async runtimes).
    pub nonblocking: bool,
}

/// A zero `SO_RCVTIMEO` means "block forever", so a zero timeout is refused.
pub(crate) fn ensure_nonzero_timeout(timeout: Duration) -> io::Result<()> {
    if timeout.is_zero() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "receive timeout must be greater than zero",
        ));
    }
    Ok(())
}

impl SocketOptions {
    /// Create and bind an IPv4 UDP socket aimed at `target`.
    ///
    /// Multicast TTL and loopback are only touched when `target` is a multicast group.
    /// Loopback stays enabled so a server on the same host answers.
    pub(crate) fn bind_udp(&self, target: &SocketAddr) -> io::Result<UdpSocket> {
        if let Some(timeout) = self.timeout {
            ensure_nonzero_timeout(timeout)?;
        }
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

        if target.ip().is_multicast() {
            socket.set_multicast_ttl_v4(self.multicast_ttl)?;
            socket.set_multicast_loop_v4(true)?;
        }

        if let Some(timeout) = self.timeout {
            socket.set_read_timeout(Some(timeout))?;
            socket.set_write_timeout(Some(timeout))?;
        }

        socket.set_nonblocking(self.nonblocking)?;
        socket.bind(&self.bind.into())?;
        Ok(socket.into())
    }
}
