// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Wall-clock sources for stamping packets.
//!
//! Client and server never call `SystemTime::now()` directly; they read time through a
//! [`TimeSource`] so exchanges can be replayed against fixed or scripted clocks.

use crate::protocol::Timestamp;
use crate::unix_time::{self, Instant};

/// Something that can report the current wall-clock time.
///
/// Closures returning an [`Instant`] implement this trait, which is the usual way to
/// inject a fixed clock in tests:
///
/// ```
/// use sntp_proto::clock::TimeSource;
/// use sntp_proto::unix_time::Instant;
///
/// let fixed = || Instant::new(1_704_067_200, 0).unwrap_or_default();
/// assert_eq!(fixed.now().secs(), 1_704_067_200);
/// assert_eq!(fixed.now_timestamp().seconds, 3_913_056_000);
/// ```
pub trait TimeSource: Send + Sync {
    /// The current time.
    fn now(&self) -> Instant;

    /// The current time encoded as a protocol timestamp.
    fn now_timestamp(&self) -> Timestamp {
        unix_time::to_protocol_timestamp(self.now())
    }
}

/// The operating system's real-time clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<F> TimeSource for F
where
    F: Fn() -> Instant + Send + Sync,
{
    fn now(&self) -> Instant {
        self()
    }
}
