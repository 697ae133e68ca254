// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Listener socket creation, optionally joined to an IPv4 multicast group.
//!
//! Clients send their request to a group such as `224.0.0.1:1123` and every member
//! answers from its own unicast address. Membership is only needed for groups the
//! kernel does not deliver by default; `224.0.0.1` (all hosts) reaches every host on
//! the segment already.
//!
//! # Security Warning
//!
//! Multicast SNTP provides no authentication and is trivially spoofed. Use only on
//! trusted networks.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

/// IPv4 multicast membership for the listener.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MulticastConfig {
    /// Group to join.
    pub group: Ipv4Addr,
    /// Local interface address to join on (`0.0.0.0` lets the kernel choose).
    pub interface: Ipv4Addr,
}

impl MulticastConfig {
    /// Join `group` on the default interface.
    pub fn new(group: Ipv4Addr) -> Self {
        MulticastConfig {
            group,
            interface: Ipv4Addr::UNSPECIFIED,
        }
    }
}

/// Create and bind the server's IPv4 UDP socket.
///
/// Sets `SO_REUSEADDR` so several servers on one host can share a multicast port, joins
/// the group when `multicast` is given, and leaves the socket non-blocking for the async
/// runtime.
pub fn bind_listener(listen: SocketAddr, multicast: Option<&MulticastConfig>) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&listen.into())?;

    if let Some(config) = multicast {
        socket.join_multicast_v4(&config.group, &config.interface)?;
    }

    Ok(socket.into())
}
