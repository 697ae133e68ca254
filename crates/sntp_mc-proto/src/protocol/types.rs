// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use super::{ConstPackedSizeBytes, PACKET_LEN};

/// **Timestamp Format** - a 32-bit unsigned seconds field counting from the protocol epoch
/// (0 h 1 January 1900 UTC) and a 32-bit fraction field resolving 232 picoseconds.
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Seconds                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Fraction                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Both halves are `u32`, so the fraction always lies in `[0, 2^32)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    /// Seconds since 1900-01-01 00:00:00 UTC (32-bit unsigned).
    pub seconds: u32,
    /// Fractional seconds in units of 2^-32 s.
    pub fraction: u32,
}

/// A 2-bit integer warning of an impending leap second to be inserted or deleted in the last
/// minute of the current month.
///
/// Note that this field is packed in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap required.
    #[default]
    NoWarning = 0,
    /// Last minute of the day has 61 seconds.
    AddOne = 1,
    /// Last minute of the day has 59 seconds.
    SubOne = 2,
    /// Clock unsynchronized.
    Unknown = 3,
}

impl TryFrom<u8> for LeapIndicator {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LeapIndicator::NoWarning),
            1 => Ok(LeapIndicator::AddOne),
            2 => Ok(LeapIndicator::SubOne),
            3 => Ok(LeapIndicator::Unknown),
            _ => Err(()),
        }
    }
}

/// A 3-bit integer representing the protocol version number.
///
/// Note that while this struct is 8-bits, this field is packed to 3 in the actual header.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version(pub(super) u8);

/// A 3-bit integer representing the association mode.
///
/// Note that while this enum is 8-bits, this field is packed to 3 in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Reserved mode (value 0).
    Reserved = 0,
    /// Symmetric active mode (value 1).
    SymmetricActive = 1,
    /// Symmetric passive mode (value 2).
    SymmetricPassive = 2,
    /// Client mode (value 3).
    #[default]
    Client = 3,
    /// Server mode (value 4).
    Server = 4,
    /// Broadcast mode (value 5).
    Broadcast = 5,
    /// Control message mode (value 6).
    ControlMessage = 6,
    /// Reserved for private use (value 7).
    ReservedForPrivateUse = 7,
}

impl TryFrom<u8> for Mode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Reserved),
            1 => Ok(Mode::SymmetricActive),
            2 => Ok(Mode::SymmetricPassive),
            3 => Ok(Mode::Client),
            4 => Ok(Mode::Server),
            5 => Ok(Mode::Broadcast),
            6 => Ok(Mode::ControlMessage),
            7 => Ok(Mode::ReservedForPrivateUse),
            _ => Err(()),
        }
    }
}

/// An 8-bit integer representing the stratum.
///
/// ```ignore
/// +--------+-----------------------------------------------------+
/// | Value  | Meaning                                             |
/// +--------+-----------------------------------------------------+
/// | 0      | unspecified or invalid                              |
/// | 1      | primary server (e.g., equipped with a GPS receiver) |
/// | 2-15   | secondary server (via NTP)                          |
/// | 16     | unsynchronized                                      |
/// | 17-255 | reserved                                            |
/// +--------+-----------------------------------------------------+
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stratum(pub u8);

/// A 32-bit code identifying the particular server or reference clock.
///
/// For stratum 1 this is a four-octet, left-justified, zero-padded ASCII string such as
/// `LOCL` or `GPS\0`. The bytes are carried verbatim; this profile never interprets them.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ReferenceIdentifier(pub [u8; 4]);

/// **Packet Header** - the fixed 48-byte record exchanged between client and server.
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |LI | VN  |Mode |    Stratum     |     Poll      |  Precision   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Delay                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Dispersion                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Reference ID                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                     Reference Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Originate Timestamp (64)                 +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Receive Timestamp (64)                   +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Transmit Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// A packet is built fresh for every exchange and dropped once the reply has been
/// processed; nothing about it is persisted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Packet {
    /// Leap indicator warning of impending leap second.
    pub leap_indicator: LeapIndicator,
    /// Protocol version number.
    pub version: Version,
    /// Association mode (client request or server reply).
    pub mode: Mode,
    /// Stratum level of the time source.
    pub stratum: Stratum,
    /// Maximum interval between successive messages, in log2 seconds.
    pub poll: i8,
    /// Precision of the system clock, in log2 seconds.
    pub precision: i8,
    /// Total round-trip delay to the reference clock, signed 16.16 fixed-point seconds.
    pub root_delay: i32,
    /// Total dispersion to the reference clock, unsigned 16.16 fixed-point seconds.
    pub root_dispersion: u32,
    /// Reference identifier (clock source).
    pub reference_id: ReferenceIdentifier,
    /// Time when the system clock was last set or corrected.
    pub reference_timestamp: Timestamp,
    /// Time at the client when the request departed for the server (T1).
    pub originate_timestamp: Timestamp,
    /// Time at the server when the request arrived from the client (T2).
    pub receive_timestamp: Timestamp,
    /// Time at the sender when the packet left (T1 in a request, T3 in a reply).
    pub transmit_timestamp: Timestamp,
}

/// The consecutive types within the first packed byte in the packet.
pub type PacketByte1 = (LeapIndicator, Version, Mode);

// Inherent implementations.

impl Timestamp {
    /// Create a timestamp from its raw seconds and fraction fields.
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Timestamp { seconds, fraction }
    }

    /// Whether both fields are zero (an unset timestamp).
    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }

    /// The timestamp as a big-endian byte array, seconds first.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.seconds.to_be_bytes());
        out[4..].copy_from_slice(&self.fraction.to_be_bytes());
        out
    }

    /// Decode a timestamp from a big-endian byte array, seconds first.
    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Timestamp {
            seconds: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            fraction: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Seconds since the protocol epoch as a float, ignoring era rollover.
    pub fn to_f64(&self) -> f64 {
        self.seconds as f64 + self.fraction as f64 / 4_294_967_296.0
    }
}

impl ReferenceIdentifier {
    /// Reference identifier for an undisciplined local clock.
    pub const LOCL: Self = ReferenceIdentifier(*b"LOCL");

    /// Returns the raw 4-byte representation of the reference identifier.
    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl Version {
    /// SNTP/NTP version 3.
    pub const V3: Self = Version(3);
    /// SNTP/NTP version 4 (the only version this profile speaks).
    pub const V4: Self = Version(4);

    /// Create a `Version` from a raw version number.
    ///
    /// Returns `None` if the value does not fit the 3-bit header field.
    pub fn new(v: u8) -> Option<Self> {
        if v <= 0b111 { Some(Version(v)) } else { None }
    }

    /// Returns the raw version number as a `u8`.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether or not the version is a published protocol version (1-4).
    pub fn is_known(&self) -> bool {
        self.0 >= 1 && self.0 <= 4
    }
}

impl Stratum {
    /// Unspecified or invalid.
    pub const UNSPECIFIED: Self = Stratum(0);
    /// The primary server (e.g. equipped with a GPS receiver).
    pub const PRIMARY: Self = Stratum(1);
    /// An unsynchronized stratum.
    pub const UNSYNCHRONIZED: Self = Stratum(16);

    /// Whether or not the stratum is in the reserved range.
    pub fn is_reserved(&self) -> bool {
        *self > Self::UNSYNCHRONIZED
    }
}

impl Packet {
    /// Build a client-mode request whose only populated field is the transmit timestamp.
    pub fn client_request(transmit_timestamp: Timestamp) -> Self {
        Packet {
            transmit_timestamp,
            ..Packet::default()
        }
    }

    /// Serialize the packet into its 48-byte big-endian wire form.
    pub fn to_wire(&self) -> [u8; PACKET_LEN] {
        let mut buf = [0u8; PACKET_LEN];
        buf[0] = pack_li_vn_mode(self.leap_indicator, self.version, self.mode);
        buf[1] = self.stratum.0;
        buf[2] = self.poll as u8;
        buf[3] = self.precision as u8;
        buf[4..8].copy_from_slice(&self.root_delay.to_be_bytes());
        buf[8..12].copy_from_slice(&self.root_dispersion.to_be_bytes());
        buf[12..16].copy_from_slice(&self.reference_id.0);
        buf[16..24].copy_from_slice(&self.reference_timestamp.to_be_bytes());
        buf[24..32].copy_from_slice(&self.originate_timestamp.to_be_bytes());
        buf[32..40].copy_from_slice(&self.receive_timestamp.to_be_bytes());
        buf[40..48].copy_from_slice(&self.transmit_timestamp.to_be_bytes());
        buf
    }
}

/// Pack the leap indicator, version and mode into the first header byte.
pub fn pack_li_vn_mode(li: LeapIndicator, vn: Version, mode: Mode) -> u8 {
    let mut li_vn_mode = 0u8;
    li_vn_mode |= (li as u8) << 6;
    li_vn_mode |= (vn.0 & 0b111) << 3;
    li_vn_mode |= mode as u8;
    li_vn_mode
}

/// Unpack the first header byte into leap indicator, version and mode.
///
/// Every bit pattern is a valid triple, so this cannot fail.
pub fn unpack_li_vn_mode(byte: u8) -> PacketByte1 {
    let li = match byte >> 6 {
        0 => LeapIndicator::NoWarning,
        1 => LeapIndicator::AddOne,
        2 => LeapIndicator::SubOne,
        _ => LeapIndicator::Unknown,
    };
    let vn = Version((byte >> 3) & 0b111);
    let mode = match byte & 0b111 {
        0 => Mode::Reserved,
        1 => Mode::SymmetricActive,
        2 => Mode::SymmetricPassive,
        3 => Mode::Client,
        4 => Mode::Server,
        5 => Mode::Broadcast,
        6 => Mode::ControlMessage,
        _ => Mode::ReservedForPrivateUse,
    };
    (li, vn, mode)
}

// Size implementations.

impl ConstPackedSizeBytes for Timestamp {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for Stratum {
    const PACKED_SIZE_BYTES: usize = 1;
}

impl ConstPackedSizeBytes for ReferenceIdentifier {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for PacketByte1 {
    const PACKED_SIZE_BYTES: usize = 1;
}

impl ConstPackedSizeBytes for Packet {
    const PACKED_SIZE_BYTES: usize = PacketByte1::PACKED_SIZE_BYTES
        + Stratum::PACKED_SIZE_BYTES
        + 2
        + 4 * 2
        + ReferenceIdentifier::PACKED_SIZE_BYTES
        + Timestamp::PACKED_SIZE_BYTES * 4;
}

// Default implementations.

impl Default for Version {
    /// Defaults to version 4.
    fn default() -> Self {
        Version::V4
    }
}

impl Default for Packet {
    /// Defaults to a version 4 client request template with every other field zeroed.
    ///
    /// Set `transmit_timestamp` before sending.
    fn default() -> Self {
        Packet {
            leap_indicator: LeapIndicator::default(),
            version: Version::default(),
            mode: Mode::default(),
            stratum: Stratum::default(),
            poll: 0,
            precision: 0,
            root_delay: 0,
            root_dispersion: 0,
            reference_id: ReferenceIdentifier::default(),
            reference_timestamp: Timestamp::default(),
            originate_timestamp: Timestamp::default(),
            receive_timestamp: Timestamp::default(),
            transmit_timestamp: Timestamp::default(),
        }
    }
}

// Display implementations.

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:08x}", self.seconds, self.fraction)
    }
}

impl fmt::Display for ReferenceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in &self.0 {
            if b == 0 {
                break;
            }
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "?")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_size_is_48() {
        assert_eq!(Packet::PACKED_SIZE_BYTES, 48);
        assert_eq!(Packet::PACKED_SIZE_BYTES, PACKET_LEN);
    }

    #[test]
    fn client_request_header_byte() {
        let wire = Packet::client_request(Timestamp::new(1, 2)).to_wire();
        assert_eq!(wire[0], 0x23);
    }

    #[test]
    fn server_reply_header_byte() {
        assert_eq!(
            pack_li_vn_mode(LeapIndicator::NoWarning, Version::V4, Mode::Server),
            0x24
        );
    }

    #[test]
    fn unpack_covers_every_byte() {
        for byte in 0..=u8::MAX {
            let (li, vn, mode) = unpack_li_vn_mode(byte);
            assert_eq!(pack_li_vn_mode(li, vn, mode), byte);
        }
    }

    #[test]
    fn to_wire_places_seconds_big_endian() {
        let packet = Packet {
            transmit_timestamp: Timestamp::new(0x0102_0304, 0x0506_0708),
            ..Packet::default()
        };
        let wire = packet.to_wire();
        assert_eq!(&wire[40..48], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn version_new_rejects_wide_values() {
        assert_eq!(Version::new(4), Some(Version::V4));
        assert_eq!(Version::new(8), None);
        assert!(!Version(0).is_known());
        assert!(Version::V4.is_known());
    }

    #[test]
    fn reference_id_display() {
        assert_eq!(ReferenceIdentifier::LOCL.to_string(), "LOCL");
        assert_eq!(ReferenceIdentifier(*b"GPS\0").to_string(), "GPS");
    }

    #[test]
    fn timestamp_to_f64() {
        let ts = Timestamp::new(10, 0x8000_0000);
        assert!((ts.to_f64() - 10.5).abs() < 1e-12);
    }
}
