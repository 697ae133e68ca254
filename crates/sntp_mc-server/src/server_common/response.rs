// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use sntp_proto::protocol::{Mode, PACKET_LEN, Packet, TRANSMIT_TIMESTAMP_OFFSET, Timestamp};

use super::ServerState;

/// Build the reply to a validated client request.
///
/// - `originate_timestamp` is the client's `transmit_timestamp` (the correlation token)
/// - `receive_timestamp` and `reference_timestamp` are both T2
/// - `poll` is echoed from the request
/// - `transmit_timestamp` is left zero; [`serialize_response_with_t3`] fills it in
pub fn build_server_response(request: &Packet, state: &ServerState, t2: Timestamp) -> Packet {
    Packet {
        leap_indicator: state.leap_indicator,
        version: state.version,
        mode: Mode::Server,
        stratum: state.stratum,
        poll: request.poll,
        precision: state.precision,
        root_delay: 0,
        root_dispersion: 0,
        reference_id: state.reference_id,
        reference_timestamp: t2,
        originate_timestamp: request.transmit_timestamp,
        receive_timestamp: t2,
        transmit_timestamp: Timestamp::default(),
    }
}

/// Serialize a reply and patch T3 into bytes 40..48.
///
/// Callers read `t3` immediately before handing the buffer to the socket.
pub fn serialize_response_with_t3(response: &Packet, t3: Timestamp) -> [u8; PACKET_LEN] {
    let mut buf = response.to_wire();
    buf[TRANSMIT_TIMESTAMP_OFFSET..PACKET_LEN].copy_from_slice(&t3.to_be_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use sntp_proto::protocol::{LeapIndicator, ReferenceIdentifier, Stratum, Version};

    fn request() -> Packet {
        Packet {
            poll: 6,
            transmit_timestamp: Timestamp::new(3_900_000_000, 0x1234_5678),
            ..Packet::default()
        }
    }

    #[test]
    fn reply_echoes_request_fields() {
        let t2 = Timestamp::new(3_900_000_001, 42);
        let reply = build_server_response(&request(), &ServerState::default(), t2);
        assert_eq!(reply.mode, Mode::Server);
        assert_eq!(reply.version, Version::V4);
        assert_eq!(reply.leap_indicator, LeapIndicator::NoWarning);
        assert_eq!(reply.stratum, Stratum::PRIMARY);
        assert_eq!(reply.poll, 6);
        assert_eq!(reply.originate_timestamp, request().transmit_timestamp);
        assert_eq!(reply.receive_timestamp, t2);
        assert_eq!(reply.reference_timestamp, t2);
        assert!(reply.transmit_timestamp.is_zero());
    }

    #[test]
    fn reply_uses_configured_state() {
        let state = ServerState {
            stratum: Stratum(3),
            precision: -20,
            reference_id: ReferenceIdentifier::LOCL,
            ..ServerState::default()
        };
        let reply = build_server_response(&request(), &state, Timestamp::new(1, 0));
        assert_eq!(reply.stratum, Stratum(3));
        assert_eq!(reply.precision, -20);
        assert_eq!(&reply.reference_id.0, b"LOCL");
    }

    #[test]
    fn t3_patched_last() {
        let reply = build_server_response(&request(), &ServerState::default(), Timestamp::new(7, 7));
        let t3 = Timestamp::new(0x0102_0304, 0x0506_0708);
        let buf = serialize_response_with_t3(&reply, t3);
        assert_eq!(&buf[40..48], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buf[0], 0x24);
        let decoded = Packet::from_wire(&buf).unwrap();
        assert_eq!(decoded.transmit_timestamp, t3);
        assert_eq!(decoded.receive_timestamp, Timestamp::new(7, 7));
    }
}
