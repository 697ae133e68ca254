// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Clock offset and round-trip delay arithmetic.
//!
//! Two computations are provided:
//!
//! - [`clock_offset`] reproduces the multicast reference client bit-for-bit. It works on
//!   the raw seconds and fraction fields independently, in wrapping 32-bit arithmetic:
//!
//!   ```text
//!   delay      = ((T2 - T1) + (T3 - T4)) / 2
//!   raw_offset = (T4 - T1) - (T3 - T2)
//!   offset     = |delay - raw_offset|
//!   ```
//!
//!   This is not the RFC 4330 formula. Its "delay" term is actually the RFC offset, and
//!   the subtraction mixes the two. It is kept because it is what the reference peers
//!   print and compare.
//!
//! - [`offset_delay`] is the RFC 4330 computation on era-resolved floating-point
//!   seconds, reported alongside for diagnostics.

use std::fmt;

use sntp_proto::protocol::Timestamp;
use sntp_proto::unix_time;

/// Magnitude of the clock offset as computed by the reference formula.
///
/// `seconds` and `fraction` are independent 32-bit results; a borrow between them is
/// never propagated.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ClockOffset {
    /// Whole-second component.
    pub seconds: u32,
    /// Sub-second component in units of 2^-32 s.
    pub fraction: u32,
}

impl ClockOffset {
    /// The fraction component converted to microseconds (rounded, at most 999 999).
    pub fn subsec_micros(&self) -> u32 {
        let micros = (u64::from(self.fraction) * 1_000_000 + (1 << 31)) >> 32;
        micros.min(999_999) as u32
    }
}

impl fmt::Display for ClockOffset {
    /// Formats as `<seconds>.<microseconds>`, e.g. `0.150000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.seconds, self.subsec_micros())
    }
}

fn offset_component(t1: u32, t2: u32, t3: u32, t4: u32) -> u32 {
    let delay = t2.wrapping_sub(t1).wrapping_add(t3.wrapping_sub(t4)) / 2;
    let raw_offset = t4.wrapping_sub(t1).wrapping_sub(t3.wrapping_sub(t2));
    (delay.wrapping_sub(raw_offset) as i32).unsigned_abs()
}

/// Compute the clock offset from the four exchange timestamps.
///
/// - `t1`: originate timestamp echoed by the server
/// - `t2`: server receive timestamp
/// - `t3`: server transmit timestamp
/// - `t4`: client destination timestamp
pub fn clock_offset(t1: Timestamp, t2: Timestamp, t3: Timestamp, t4: Timestamp) -> ClockOffset {
    ClockOffset {
        seconds: offset_component(t1.seconds, t2.seconds, t3.seconds, t4.seconds),
        fraction: offset_component(t1.fraction, t2.fraction, t3.fraction, t4.fraction),
    }
}

/// Compute RFC 4330 clock offset and round-trip delay, in seconds.
///
/// All four timestamps are resolved to absolute time using `t4` as the era pivot, so the
/// result is correct across the 2036 rollover. A positive offset means the local clock is
/// behind the server.
pub fn offset_delay(t1: Timestamp, t2: Timestamp, t3: Timestamp, t4: Timestamp) -> (f64, f64) {
    let pivot = unix_time::from_protocol_timestamp(t4);
    let abs = |ts: Timestamp| -> f64 { unix_time::timestamp_to_instant(ts, &pivot).as_f64() };
    let (t1, t2, t3, t4) = (abs(t1), abs(t2), abs(t3), abs(t4));
    let offset = ((t2 - t1) + (t3 - t4)) / 2.0;
    let delay = (t4 - t1) - (t3 - t2);
    (offset, delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(seconds: u32, fraction: u32) -> Timestamp {
        Timestamp::new(seconds, fraction)
    }

    #[test]
    fn reference_formula_whole_seconds() {
        // delay = (2 + 2) / 2 = 2, raw = 1 - 1 = 0
        let off = clock_offset(ts(1000, 0), ts(1002, 0), ts(1003, 0), ts(1001, 0));
        assert_eq!(off, ClockOffset { seconds: 2, fraction: 0 });
    }

    #[test]
    fn reference_formula_half_second_fractions() {
        // T1=1000.0 T2=1000.5 T3=1001.0 T4=1001.4
        let off = clock_offset(
            ts(1000, 0),
            ts(1000, 0x8000_0000),
            ts(1001, 0),
            ts(1001, 1_717_986_918),
        );
        assert_eq!(off.seconds, 0);
        // Fraction components wrap independently of the seconds.
        assert_eq!(off.fraction, 644_245_095);
    }

    #[test]
    fn reference_formula_keeps_unsigned_halving() {
        // (T2 - T1) + (T3 - T4) = -6, which wraps to 4294967290 before the halving.
        let off = clock_offset(ts(1000, 0), ts(998, 0), ts(999, 0), ts(1003, 0));
        assert_eq!(off.seconds, 2_147_483_643);
    }

    #[test]
    fn identical_timestamps_give_zero() {
        let t = ts(3_900_000_000, 12345);
        assert_eq!(clock_offset(t, t, t, t), ClockOffset::default());
    }

    #[test]
    fn display_prints_microseconds() {
        let off = ClockOffset {
            seconds: 3,
            fraction: 0x8000_0000,
        };
        assert_eq!(off.to_string(), "3.500000");
        let off = ClockOffset {
            seconds: 0,
            fraction: u32::MAX,
        };
        assert_eq!(off.subsec_micros(), 999_999);
    }

    #[test]
    fn rfc_offset_delay_symmetric() {
        // T1=0, T2=0.5, T3=0.5, T4=1.0 relative to an arbitrary base.
        let base = 3_913_056_000;
        let (offset, delay) = offset_delay(
            ts(base, 0),
            ts(base, 0x8000_0000),
            ts(base, 0x8000_0000),
            ts(base + 1, 0),
        );
        assert!(offset.abs() < 1e-5, "expected ~0 offset, got {offset}");
        assert!((delay - 1.0).abs() < 1e-5, "expected 1.0 delay, got {delay}");
    }

    #[test]
    fn rfc_offset_local_behind() {
        // T1=0, T2=1.5, T3=1.5, T4=1.0 => offset 1.0, delay 1.0
        let base = 3_913_056_000;
        let (offset, delay) = offset_delay(
            ts(base, 0),
            ts(base + 1, 0x8000_0000),
            ts(base + 1, 0x8000_0000),
            ts(base + 1, 0),
        );
        assert!((offset - 1.0).abs() < 1e-5, "expected 1.0 offset, got {offset}");
        assert!((delay - 1.0).abs() < 1e-5, "expected 1.0 delay, got {delay}");
    }

    #[test]
    fn rfc_offset_across_era_rollover() {
        // Request just before the 2036 rollover, reply just after.
        let (offset, delay) = offset_delay(ts(u32::MAX, 0), ts(0, 0), ts(0, 0), ts(1, 0));
        assert!(offset.abs() < 1e-5, "expected ~0 offset, got {offset}");
        assert!((delay - 2.0).abs() < 1e-5, "expected 2.0 delay, got {delay}");
    }
}
