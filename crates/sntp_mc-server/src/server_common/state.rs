// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use sntp_proto::protocol::{LeapIndicator, ReferenceIdentifier, Stratum, Version};

/// Fields the server stamps into every reply.
///
/// The defaults describe the minimal profile: a stratum-1 server with no leap warning.
/// The server never consults an upstream reference, so these are claims, not measurements.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerState {
    /// Leap indicator carried in replies.
    pub leap_indicator: LeapIndicator,
    /// Version carried in replies.
    pub version: Version,
    /// Stratum level claimed by this server.
    pub stratum: Stratum,
    /// Precision of the server's clock, in log2 seconds (e.g., -20 ≈ 1μs).
    pub precision: i8,
    /// Reference identifier carried in replies.
    pub reference_id: ReferenceIdentifier,
}

impl Default for ServerState {
    fn default() -> Self {
        ServerState {
            leap_indicator: LeapIndicator::NoWarning,
            version: Version::V4,
            stratum: Stratum::PRIMARY,
            precision: 0,
            reference_id: ReferenceIdentifier::default(),
        }
    }
}
