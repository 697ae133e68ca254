// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! One request/reply round trip as an explicit state machine.
//!
//! ```text
//! Idle --send_request--> RequestSent --await_reply--> ReplyReceived --compute_offset--> OffsetComputed
//! ```
//!
//! The reply is correlated with the request only by its originate timestamp, which must
//! echo the transmit timestamp we sent. `OffsetComputed` is terminal; a retry starts a
//! new [`Exchange`].

use std::fmt;
use std::net::SocketAddr;
use std::ops::Deref;

use log::debug;
use sntp_proto::clock::TimeSource;
use sntp_proto::protocol::{Mode, PACKET_LEN, Packet, Timestamp};

use crate::error::{ProtocolError, SntpError};
use crate::offset::{self, ClockOffset};
use crate::transport::DatagramTransport;

// Larger than a packet so oversized datagrams are seen (and rejected) whole.
const RECV_BUF_LEN: usize = 1024;

/// Where an [`Exchange`] is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ExchangeState {
    /// Nothing sent yet.
    #[default]
    Idle,
    /// Request handed to the transport; waiting for the reply.
    RequestSent,
    /// A matching reply has been decoded and stamped with T4.
    ReplyReceived,
    /// Offset computed; terminal.
    OffsetComputed,
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExchangeState::Idle => "IDLE",
            ExchangeState::RequestSent => "REQUEST_SENT",
            ExchangeState::ReplyReceived => "REPLY_RECEIVED",
            ExchangeState::OffsetComputed => "OFFSET_COMPUTED",
        };
        f.write_str(name)
    }
}

/// The outcome of a completed exchange.
///
/// This struct implements `Deref<Target = Packet>`, so reply fields can be accessed
/// directly (e.g., `result.stratum`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExchangeResult {
    /// The server's reply.
    pub packet: Packet,
    /// Address the reply came from.
    pub server: SocketAddr,
    /// The destination timestamp (T4): local time when the reply was received.
    pub destination_timestamp: Timestamp,
    /// Offset magnitude per the reference formula (see [`offset::clock_offset`]).
    pub clock_offset: ClockOffset,
    /// RFC 4330 clock offset in seconds. Positive means the local clock is behind.
    pub offset_seconds: f64,
    /// RFC 4330 round-trip delay in seconds.
    pub delay_seconds: f64,
}

impl Deref for ExchangeResult {
    type Target = Packet;
    fn deref(&self) -> &Self::Target {
        &self.packet
    }
}

#[derive(Clone, Copy, Debug)]
struct Reply {
    packet: Packet,
    source: SocketAddr,
    destination_timestamp: Timestamp,
}

/// A single client exchange.
#[derive(Clone, Debug, Default)]
pub struct Exchange {
    state: ExchangeState,
    target: Option<SocketAddr>,
    transmit_timestamp: Timestamp,
    reply: Option<Reply>,
}

impl Exchange {
    /// A fresh exchange in the `Idle` state.
    pub fn new() -> Self {
        Exchange::default()
    }

    /// The current state.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// The transmit timestamp (T1) of the request, once built.
    pub fn transmit_timestamp(&self) -> Option<Timestamp> {
        self.target.map(|_| self.transmit_timestamp)
    }

    fn expect_state(&self, expected: ExchangeState) -> Result<(), SntpError> {
        if self.state != expected {
            return Err(ProtocolError::InvalidState {
                expected,
                actual: self.state,
            }
            .into());
        }
        Ok(())
    }

    /// Stamp T1 and build the serialized request. The exchange stays `Idle`.
    ///
    /// Split from [`send_request`](Self::send_request) so async transports can do the
    /// send themselves and then call [`mark_sent`](Self::mark_sent). Preparing again
    /// before sending replaces the request.
    pub fn prepare_request<C: TimeSource + ?Sized>(
        &mut self,
        target: SocketAddr,
        clock: &C,
    ) -> Result<[u8; PACKET_LEN], SntpError> {
        self.expect_state(ExchangeState::Idle)?;
        let t1 = clock.now_timestamp();
        let request = Packet::client_request(t1);
        self.transmit_timestamp = t1;
        self.target = Some(target);
        debug!("request to {target}: transmit {t1}");
        Ok(request.to_wire())
    }

    /// Record that the prepared request was handed to the transport, moving to
    /// `RequestSent`.
    pub fn mark_sent(&mut self) -> Result<(), SntpError> {
        self.expect_state(ExchangeState::Idle)?;
        self.state = ExchangeState::RequestSent;
        Ok(())
    }

    /// Build the request and hand it to `transport`.
    ///
    /// A failed send leaves the exchange `Idle`.
    pub fn send_request<T, C>(
        &mut self,
        transport: &T,
        target: SocketAddr,
        clock: &C,
    ) -> Result<Timestamp, SntpError>
    where
        T: DatagramTransport + ?Sized,
        C: TimeSource + ?Sized,
    {
        let wire = self.prepare_request(target, clock)?;
        let sent = transport
            .send_to(&wire, target)
            .map_err(SntpError::Transport)?;
        debug!("sent: {sent}");
        self.mark_sent()?;
        Ok(self.transmit_timestamp)
    }

    /// Block for one datagram, stamp T4 and validate it.
    pub fn await_reply<T, C>(&mut self, transport: &T, clock: &C) -> Result<&Packet, SntpError>
    where
        T: DatagramTransport + ?Sized,
        C: TimeSource + ?Sized,
    {
        self.expect_state(ExchangeState::RequestSent)?;
        let mut buf = [0u8; RECV_BUF_LEN];
        let (len, source) = transport
            .recv_from(&mut buf)
            .map_err(SntpError::Transport)?;
        let t4 = clock.now_timestamp();
        debug!("recv: {len} bytes from {source}");
        self.accept_reply(&buf[..len], source, t4)
    }

    /// Validate a received datagram and move to `ReplyReceived`.
    ///
    /// `destination_timestamp` is T4, read as soon as the datagram arrived. On error the
    /// exchange stays in `RequestSent`.
    pub fn accept_reply(
        &mut self,
        datagram: &[u8],
        source: SocketAddr,
        destination_timestamp: Timestamp,
    ) -> Result<&Packet, SntpError> {
        self.expect_state(ExchangeState::RequestSent)?;

        let packet = Packet::from_wire(datagram)?;

        if packet.mode != Mode::Server {
            return Err(ProtocolError::UnexpectedMode { mode: packet.mode }.into());
        }

        // Replies to a multicast request come from the servers' own unicast addresses.
        if let Some(target) = self.target
            && !target.ip().is_multicast()
            && target.ip() != source.ip()
        {
            return Err(ProtocolError::UnexpectedSource.into());
        }

        if packet.originate_timestamp != self.transmit_timestamp {
            return Err(ProtocolError::OriginMismatch {
                expected: self.transmit_timestamp,
                received: packet.originate_timestamp,
            }
            .into());
        }

        self.state = ExchangeState::ReplyReceived;
        let reply = self.reply.insert(Reply {
            packet,
            source,
            destination_timestamp,
        });
        Ok(&reply.packet)
    }

    /// Compute offset and delay from T1..T4, moving to the terminal `OffsetComputed`.
    pub fn compute_offset(&mut self) -> Result<ExchangeResult, SntpError> {
        self.expect_state(ExchangeState::ReplyReceived)?;
        let Some(reply) = self.reply else {
            return Err(ProtocolError::InvalidState {
                expected: ExchangeState::ReplyReceived,
                actual: self.state,
            }
            .into());
        };

        let t1 = reply.packet.originate_timestamp;
        let t2 = reply.packet.receive_timestamp;
        let t3 = reply.packet.transmit_timestamp;
        let t4 = reply.destination_timestamp;

        let clock_offset = offset::clock_offset(t1, t2, t3, t4);
        let (offset_seconds, delay_seconds) = offset::offset_delay(t1, t2, t3, t4);
        debug!(
            "offset {clock_offset} (rfc offset {offset_seconds:.6}s, delay {delay_seconds:.6}s)"
        );

        self.state = ExchangeState::OffsetComputed;
        Ok(ExchangeResult {
            packet: reply.packet,
            server: reply.source,
            destination_timestamp: t4,
            clock_offset,
            offset_seconds,
            delay_seconds,
        })
    }
}
