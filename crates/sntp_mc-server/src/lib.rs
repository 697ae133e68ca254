// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTPv4 server library using the tokio runtime.
//!
//! Answers client-mode requests, unicast or sent to a multicast group, with a stratum-1
//! server-mode reply. The receive timestamp is read as soon as a request validates and
//! the transmit timestamp immediately before the reply is sent.

#![warn(missing_docs)]

// Re-export protocol types from sntp_proto for convenience.
pub use sntp_proto::{clock, protocol, unix_time};

/// Custom error types for programmatic error matching.
pub mod error;

/// Listener socket creation and multicast membership.
pub mod multicast;

/// Request validation, reply construction and metrics.
pub mod server_common;

/// SNTP server using the Tokio runtime.
pub mod server;
