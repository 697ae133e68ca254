// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTPv4 packet model, timestamp codec, and time-source abstraction.
//!
//! This crate provides the wire types shared by the `sntp_mc` multicast client and
//! server: the fixed 48-byte packet (RFC 4330 / RFC 5905 header), conversion between
//! Unix wall-clock time and the 64-bit protocol timestamp, and the [`clock::TimeSource`]
//! seam through which both roles read the current time.

#![warn(missing_docs)]

/// Injectable wall-clock sources.
pub mod clock;

/// Custom error types for buffer-based SNTP packet parsing and serialization.
pub mod error;

/// SNTP protocol types and constants.
pub mod protocol;

/// Unix time conversion utilities for protocol timestamps.
pub mod unix_time;
