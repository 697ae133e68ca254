// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use sntp_proto::protocol::{Mode, Packet, Version};

use crate::error::RequestError;

/// Validate an incoming client request.
///
/// Accepts exactly one 48-byte packet with version 4, mode Client and a non-zero
/// transmit timestamp. Returns the decoded packet on success.
pub(crate) fn validate_client_request(datagram: &[u8]) -> Result<Packet, RequestError> {
    let request = Packet::from_wire(datagram).map_err(|_| RequestError::WrongLength {
        received: datagram.len(),
    })?;

    if request.version != Version::V4 {
        return Err(RequestError::UnsupportedVersion {
            version: request.version.value(),
        });
    }

    if request.mode != Mode::Client {
        return Err(RequestError::UnexpectedMode { mode: request.mode });
    }

    if request.transmit_timestamp.is_zero() {
        return Err(RequestError::ZeroTransmitTimestamp);
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sntp_proto::protocol::{PACKET_LEN, Timestamp};

    fn make_valid_client_buf() -> [u8; PACKET_LEN] {
        Packet {
            poll: 6,
            transmit_timestamp: Timestamp::new(1000, 1),
            ..Packet::default()
        }
        .to_wire()
    }

    #[test]
    fn valid_client_request() {
        let buf = make_valid_client_buf();
        let pkt = validate_client_request(&buf).unwrap();
        assert_eq!(pkt.mode, Mode::Client);
        assert_eq!(pkt.version, Version::V4);
        assert_eq!(pkt.poll, 6);
    }

    #[test]
    fn wrong_lengths_rejected() {
        let buf = make_valid_client_buf();
        assert_eq!(
            validate_client_request(&[]),
            Err(RequestError::WrongLength { received: 0 })
        );
        assert_eq!(
            validate_client_request(&buf[..47]),
            Err(RequestError::WrongLength { received: 47 })
        );
        let mut long = buf.to_vec();
        long.extend_from_slice(&[0u8; 20]);
        assert_eq!(
            validate_client_request(&long),
            Err(RequestError::WrongLength { received: 68 })
        );
    }

    #[test]
    fn mode_server_rejected() {
        let mut buf = make_valid_client_buf();
        // Byte 0: LI(2)|VN(3)|Mode(3). Client=3 (0b011), Server=4 (0b100).
        buf[0] = (buf[0] & 0b1111_1000) | 4;
        assert_eq!(
            validate_client_request(&buf),
            Err(RequestError::UnexpectedMode { mode: Mode::Server })
        );
    }

    #[test]
    fn mode_broadcast_rejected() {
        let mut buf = make_valid_client_buf();
        buf[0] = (buf[0] & 0b1111_1000) | 5;
        assert!(validate_client_request(&buf).is_err());
    }

    #[test]
    fn version_3_rejected() {
        let mut buf = make_valid_client_buf();
        buf[0] = (buf[0] & 0b11_000_111) | (3 << 3);
        assert_eq!(
            validate_client_request(&buf),
            Err(RequestError::UnsupportedVersion { version: 3 })
        );
    }

    #[test]
    fn zero_transmit_rejected() {
        let mut buf = make_valid_client_buf();
        buf[40..48].fill(0);
        assert_eq!(
            validate_client_request(&buf),
            Err(RequestError::ZeroTransmitTimestamp)
        );
    }
}
