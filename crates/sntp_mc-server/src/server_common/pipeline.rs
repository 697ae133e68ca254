// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;

use sntp_proto::clock::TimeSource;
use sntp_proto::protocol::Packet;
use tracing::debug;

use crate::error::RequestError;

use super::{ServerMetrics, ServerState, build_server_response, validate_client_request};

/// The result of handling one datagram.
#[derive(Clone, Debug, PartialEq)]
pub enum HandleResult {
    /// Reply with this packet once T3 has been stamped.
    Response(Packet),
    /// Drop the datagram silently.
    Drop(RequestError),
}

/// Handle a single incoming datagram (pure logic, no I/O).
///
/// T2 is read from `clock` right after validation; the caller stamps T3 just before
/// sending.
pub fn handle_request<C: TimeSource + ?Sized>(
    datagram: &[u8],
    src_addr: SocketAddr,
    state: &ServerState,
    clock: &C,
    metrics: Option<&ServerMetrics>,
) -> HandleResult {
    if let Some(m) = metrics {
        m.inc_requests_received();
    }

    let request = match validate_client_request(datagram) {
        Ok(req) => req,
        Err(e) => {
            if let Some(m) = metrics {
                m.inc_requests_dropped();
            }
            return HandleResult::Drop(e);
        }
    };

    let t2 = clock.now_timestamp();
    debug!(%src_addr, transmit = %request.transmit_timestamp, "request received");
    HandleResult::Response(build_server_response(&request, state, t2))
}
