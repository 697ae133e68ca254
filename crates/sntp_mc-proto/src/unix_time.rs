// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Conversion between Unix wall-clock time and protocol timestamps.
//!
//! The encoding keeps the historical `+1` microsecond bias of the multicast SNTP
//! reference client: `fraction = round((micros + 1) * 2^32 / 1_000_000)`. Peers that
//! compare raw timestamps bit-for-bit depend on it, so it is not corrected here.
//! [`from_protocol_timestamp`] removes the bias again, which makes microsecond values
//! survive a round trip exactly.

use crate::protocol::Timestamp;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// The number of seconds in one protocol era (2^32 seconds, approximately 136 years).
///
/// Era 0 spans from 1900-01-01 00:00:00 UTC to 2036-02-07 06:28:15 UTC.
pub const ERA_SECONDS: i64 = 4_294_967_296; // 1i64 << 32

const MICROS_PER_SEC: u64 = 1_000_000;

/// Describes an instant relative to the `UNIX_EPOCH` - 00:00:00 Coordinated Universal Time
/// (UTC), Thursday, 1 January 1970 in whole seconds plus a microsecond component.
///
/// `subsec_micros` is always in `[0, 1_000_000)` and counts forward from `secs`, so a time
/// half a second before the epoch is `secs = -1, subsec_micros = 500_000`.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Instant {
    secs: i64,
    subsec_micros: u32,
}

impl Instant {
    /// Create a new **Instant** given its `secs` and `subsec_micros` components.
    ///
    /// Returns `None` if `subsec_micros` is not below one million.
    pub fn new(secs: i64, subsec_micros: u32) -> Option<Instant> {
        if u64::from(subsec_micros) >= MICROS_PER_SEC {
            return None;
        }
        Some(Instant {
            secs,
            subsec_micros,
        })
    }

    /// Reads the current **Instant** from `std::time::SystemTime`.
    ///
    /// ## Example
    ///
    /// ```
    /// println!("{:?}", sntp_proto::unix_time::Instant::now());
    /// ```
    pub fn now() -> Self {
        Instant::from_system_time(SystemTime::now())
    }

    /// Converts a `SystemTime` (truncating to whole microseconds).
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(duration) => Instant {
                secs: duration.as_secs() as i64,
                subsec_micros: duration.subsec_micros(),
            },
            Err(sys_time_err) => {
                let before = sys_time_err.duration();
                let micros = before.subsec_micros();
                if micros == 0 {
                    Instant {
                        secs: -(before.as_secs() as i64),
                        subsec_micros: 0,
                    }
                } else {
                    Instant {
                        secs: -(before.as_secs() as i64) - 1,
                        subsec_micros: MICROS_PER_SEC as u32 - micros,
                    }
                }
            }
        }
    }

    /// Converts back into a `SystemTime`.
    pub fn to_system_time(&self) -> SystemTime {
        let micros = Duration::from_micros(u64::from(self.subsec_micros));
        if self.secs >= 0 {
            UNIX_EPOCH + Duration::from_secs(self.secs as u64) + micros
        } else {
            UNIX_EPOCH - Duration::from_secs(self.secs.unsigned_abs()) + micros
        }
    }

    /// The "seconds" component of the **Instant**.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// The fractional component of the **Instant** in microseconds.
    pub fn subsec_micros(&self) -> u32 {
        self.subsec_micros
    }

    /// Seconds since the Unix epoch as a float.
    pub fn as_f64(&self) -> f64 {
        self.secs as f64 + f64::from(self.subsec_micros) / 1e6
    }
}

/// Encode a Unix wall-clock time as a protocol timestamp.
///
/// `seconds` wraps modulo 2^32, so instants past 2036 land in era 1 exactly as they
/// would on the wire. The `+1` microsecond bias is applied before rounding; for
/// `subsec_micros = 999_999` the rounded value would be 2^32, which is clamped to
/// `u32::MAX` to keep the fraction below one second.
pub fn to_protocol_timestamp(instant: Instant) -> Timestamp {
    let seconds = instant.secs.wrapping_add(EPOCH_DELTA) as u32;
    let biased = u64::from(instant.subsec_micros) + 1;
    let scaled = ((biased << 32) + MICROS_PER_SEC / 2) / MICROS_PER_SEC;
    let fraction = u32::try_from(scaled).unwrap_or(u32::MAX);
    Timestamp { seconds, fraction }
}

/// Decode a protocol timestamp assuming era 0 (1900-2036).
///
/// Inverse of [`to_protocol_timestamp`]: the rounded microsecond value has the encoding
/// bias subtracted again.
pub fn from_protocol_timestamp(ts: Timestamp) -> Instant {
    Instant {
        secs: i64::from(ts.seconds) - EPOCH_DELTA,
        subsec_micros: fraction_to_micros(ts.fraction),
    }
}

/// Decode a protocol timestamp, choosing the era that places it closest to `pivot`.
///
/// The 32-bit seconds field is ambiguous across eras. For live use pass
/// `Instant::now()`; for replayed captures pass a time near the capture.
pub fn timestamp_to_instant(ts: Timestamp, pivot: &Instant) -> Instant {
    let ntp_secs = era_aware_ntp_seconds(ts.seconds, pivot);
    Instant {
        secs: ntp_secs - EPOCH_DELTA,
        subsec_micros: fraction_to_micros(ts.fraction),
    }
}

fn fraction_to_micros(fraction: u32) -> u32 {
    let rounded = (u64::from(fraction) * MICROS_PER_SEC + (1 << 31)) >> 32;
    // At most 1_000_000, reached only by the clamped encoding of 999_999 µs.
    rounded.saturating_sub(1).min(MICROS_PER_SEC - 1) as u32
}

// Given a raw 32-bit seconds value, return the absolute seconds since 1900 in the
// era within half an era (~68 years) of the pivot.
fn era_aware_ntp_seconds(raw_seconds: u32, pivot: &Instant) -> i64 {
    let pivot_ntp = pivot.secs + EPOCH_DELTA;
    let raw = i64::from(raw_seconds);

    let pivot_era = pivot_ntp.div_euclid(ERA_SECONDS);
    let candidate = pivot_era * ERA_SECONDS + raw;

    let diff = candidate - pivot_ntp;
    if diff > ERA_SECONDS / 2 {
        candidate - ERA_SECONDS
    } else if diff < -(ERA_SECONDS / 2) {
        candidate + ERA_SECONDS
    } else {
        candidate
    }
}

impl From<Instant> for Timestamp {
    fn from(t: Instant) -> Self {
        to_protocol_timestamp(t)
    }
}

impl From<SystemTime> for Instant {
    fn from(t: SystemTime) -> Self {
        Instant::from_system_time(t)
    }
}
