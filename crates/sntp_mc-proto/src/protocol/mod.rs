// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Types and constants for the SNTPv4 client/server exchange.
//!
//! Provides slice-based [`FromBytes`]/[`ToBytes`] codecs as well as `ReadBytes` and
//! `WriteBytes` implementations which extend the byteorder crate `WriteBytesExt` and
//! `ReadBytesExt` traits with the ability to read and write protocol types.
//!
//! Every multi-byte field is big-endian on the wire regardless of host byte order.

use std::net::Ipv4Addr;

/// UDP port the multicast client and server use.
///
/// This deliberately differs from the IANA NTP port (123) so the pair can run unprivileged
/// next to a system time daemon.
pub const PORT: u16 = 1123;

/// Multicast group the client sends requests to ("all hosts on this subnet").
pub const MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 1);

/// Size of an SNTP packet on the wire, in bytes.
pub const PACKET_LEN: usize = 48;

/// Byte offset of the transmit timestamp within a serialized packet.
pub const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

mod bytes;
mod io;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
