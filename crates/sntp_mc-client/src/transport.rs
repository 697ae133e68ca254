// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The datagram primitives the exchange is written against.
//!
//! The exchange only needs "send one record to an endpoint" and "receive one record".
//! `std::net::UdpSocket` is the production implementation; tests substitute scripted
//! transports.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// A connectionless datagram endpoint.
///
/// `recv_from` is expected to honor whatever receive timeout the transport was
/// configured with and report expiry as `WouldBlock` or `TimedOut`.
pub trait DatagramTransport {
    /// Send `buf` as a single datagram to `target`.
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;

    /// Receive a single datagram into `buf`.
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;

    /// Bound the next `recv_from` to `timeout`, which is never zero.
    ///
    /// Transports without a configurable timeout may ignore this.
    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        let _ = timeout;
        Ok(())
    }
}

impl DatagramTransport for UdpSocket {
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf)
    }

    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        UdpSocket::set_read_timeout(self, Some(timeout))
    }
}

impl<T: DatagramTransport + ?Sized> DatagramTransport for &T {
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        (**self).send_to(buf, target)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        (**self).recv_from(buf)
    }

    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        (**self).set_read_timeout(timeout)
    }
}
