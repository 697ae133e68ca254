// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use crate::error::ParseError;

use super::{
    ConstPackedSizeBytes, FromBytes, LeapIndicator, Mode, PACKET_LEN, Packet, ReferenceIdentifier,
    Stratum, Timestamp, ToBytes, Version, unpack_li_vn_mode,
};

fn ensure_len(buf: &[u8], needed: usize) -> Result<(), ParseError> {
    if buf.len() < needed {
        return Err(ParseError::BufferTooShort {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}

impl FromBytes for Timestamp {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&buf[..8]);
        Ok((Timestamp::from_be_bytes(raw), Self::PACKED_SIZE_BYTES))
    }
}

impl FromBytes for Stratum {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        Ok((Stratum(buf[0]), 1))
    }
}

impl FromBytes for ReferenceIdentifier {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        Ok((
            ReferenceIdentifier([buf[0], buf[1], buf[2], buf[3]]),
            Self::PACKED_SIZE_BYTES,
        ))
    }
}

impl FromBytes for (LeapIndicator, Version, Mode) {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        ensure_len(buf, 1)?;
        Ok((unpack_li_vn_mode(buf[0]), 1))
    }
}

impl FromBytes for Packet {
    /// Parse the fixed header from the front of `buf`, ignoring any trailing bytes.
    ///
    /// Use [`Packet::from_wire`] to reject datagrams that are not exactly one packet.
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;

        let mut offset = 0;

        let ((leap_indicator, version, mode), n) =
            <(LeapIndicator, Version, Mode)>::from_bytes(&buf[offset..])?;
        offset += n;

        let (stratum, n) = Stratum::from_bytes(&buf[offset..])?;
        offset += n;

        let poll = buf[offset] as i8;
        offset += 1;

        let precision = buf[offset] as i8;
        offset += 1;

        let root_delay = i32::from_be_bytes([
            buf[offset],
            buf[offset + 1],
            buf[offset + 2],
            buf[offset + 3],
        ]);
        offset += 4;

        let root_dispersion = u32::from_be_bytes([
            buf[offset],
            buf[offset + 1],
            buf[offset + 2],
            buf[offset + 3],
        ]);
        offset += 4;

        let (reference_id, n) = ReferenceIdentifier::from_bytes(&buf[offset..])?;
        offset += n;

        let (reference_timestamp, n) = Timestamp::from_bytes(&buf[offset..])?;
        offset += n;

        let (originate_timestamp, n) = Timestamp::from_bytes(&buf[offset..])?;
        offset += n;

        let (receive_timestamp, n) = Timestamp::from_bytes(&buf[offset..])?;
        offset += n;

        let (transmit_timestamp, n) = Timestamp::from_bytes(&buf[offset..])?;
        offset += n;

        Ok((
            Packet {
                leap_indicator,
                version,
                mode,
                stratum,
                poll,
                precision,
                root_delay,
                root_dispersion,
                reference_id,
                reference_timestamp,
                originate_timestamp,
                receive_timestamp,
                transmit_timestamp,
            },
            offset,
        ))
    }
}

impl Packet {
    /// Decode a received datagram.
    ///
    /// Fails with [`ParseError::WrongLength`] unless `datagram` is exactly
    /// [`PACKET_LEN`] bytes long.
    pub fn from_wire(datagram: &[u8]) -> Result<Packet, ParseError> {
        if datagram.len() != PACKET_LEN {
            return Err(ParseError::WrongLength {
                expected: PACKET_LEN,
                actual: datagram.len(),
            });
        }
        let (packet, _) = Packet::from_bytes(datagram)?;
        Ok(packet)
    }
}

// Buffer-based writer implementations (io-independent).

impl ToBytes for Timestamp {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[..8].copy_from_slice(&self.to_be_bytes());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for Stratum {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[0] = self.0;
        Ok(1)
    }
}

impl ToBytes for ReferenceIdentifier {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[..4].copy_from_slice(&self.as_bytes());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for Packet {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[..Self::PACKED_SIZE_BYTES].copy_from_slice(&self.to_wire());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Packet {
        Packet {
            leap_indicator: LeapIndicator::NoWarning,
            version: Version::V4,
            mode: Mode::Server,
            stratum: Stratum::PRIMARY,
            poll: 6,
            precision: -20,
            root_delay: -0x0001_8000,
            root_dispersion: 0x0000_4000,
            reference_id: ReferenceIdentifier::LOCL,
            reference_timestamp: Timestamp::new(3_900_000_001, 7),
            originate_timestamp: Timestamp::new(3_900_000_000, 0),
            receive_timestamp: Timestamp::new(3_900_000_001, 7),
            transmit_timestamp: Timestamp::new(3_900_000_001, 99),
        }
    }

    #[test]
    fn from_wire_roundtrip() {
        let packet = sample();
        assert_eq!(Packet::from_wire(&packet.to_wire()), Ok(packet));
    }

    #[test]
    fn from_wire_rejects_short_datagram() {
        let err = Packet::from_wire(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongLength {
                expected: 48,
                actual: 10
            }
        );
    }

    #[test]
    fn from_wire_rejects_long_datagram() {
        let err = Packet::from_wire(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, ParseError::WrongLength { actual: 100, .. }));
    }

    #[test]
    fn from_bytes_accepts_trailing_data() {
        let mut buf = [0u8; 64];
        buf[..48].copy_from_slice(&sample().to_wire());
        let (packet, consumed) = Packet::from_bytes(&buf).unwrap();
        assert_eq!(consumed, 48);
        assert_eq!(packet, sample());
    }

    #[test]
    fn from_bytes_too_short() {
        let err = Packet::from_bytes(&[0u8; 47]).unwrap_err();
        assert_eq!(
            err,
            ParseError::BufferTooShort {
                needed: 48,
                available: 47
            }
        );
    }

    #[test]
    fn to_bytes_too_short() {
        let mut buf = [0u8; 20];
        assert!(sample().to_bytes(&mut buf).is_err());
        let mut buf = [0u8; 8];
        assert!(Timestamp::new(1, 1).to_bytes(&mut buf[..7]).is_err());
        assert_eq!(Timestamp::new(1, 1).to_bytes(&mut buf), Ok(8));
    }

    #[test]
    fn signed_root_delay_survives() {
        let (packet, _) = Packet::from_bytes(&sample().to_wire()).unwrap();
        assert_eq!(packet.root_delay, -0x0001_8000);
        assert_eq!(packet.precision, -20);
    }
}
