// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the SNTP server.
//!
//! Public APIs return `io::Result<T>`. Internally, errors are constructed as
//! `ServerError` variants and converted to `io::Error` via
//! `From<ServerError> for io::Error`.
//!
//! Users who want programmatic error matching can downcast via `io::Error::get_ref()`:
//!
//! ```no_run
//! use sntp_server::error::ServerError;
//!
//! # fn example(result: std::io::Result<()>) {
//! match result {
//!     Ok(()) => println!("server stopped"),
//!     Err(e) => {
//!         if let Some(srv_err) = e.get_ref()
//!             .and_then(|inner| inner.downcast_ref::<ServerError>())
//!         {
//!             let ServerError::Config(c) = srv_err;
//!             eprintln!("bad configuration: {c}");
//!         }
//!     }
//! }
//! # }
//! ```

pub use sntp_proto::error::ParseError;

use std::fmt;
use std::io;

use sntp_proto::protocol::{Mode, PACKET_LEN};

/// Errors that can occur during SNTP server operations.
///
/// Socket failures are returned as plain `io::Error`; rejected requests never leave the
/// server loop and are reported through [`RequestError`] in the request pipeline.
#[derive(Debug)]
pub enum ServerError {
    /// Invalid configuration (unresolvable listen address, bad multicast group).
    Config(ConfigError),
}

/// Reasons an incoming datagram is not answered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RequestError {
    /// The datagram is not exactly one packet long.
    WrongLength {
        /// Number of bytes received.
        received: usize,
    },
    /// Version other than 4.
    UnsupportedVersion {
        /// The version value received.
        version: u8,
    },
    /// Mode other than Client.
    UnexpectedMode {
        /// The mode received.
        mode: Mode,
    },
    /// Client transmit timestamp is zero, so the reply could not be correlated.
    ZeroTransmitTimestamp,
}

/// Server configuration errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Listen address did not resolve to an IPv4 socket address.
    InvalidListenAddress {
        /// The address that was invalid.
        address: String,
        /// Detail about why it is invalid.
        detail: String,
    },
    /// The group to join is not an IPv4 multicast address.
    NotMulticast {
        /// The address given.
        group: String,
    },
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "SNTP server config error: {e}"),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::WrongLength { received } => {
                write!(f, "expected {PACKET_LEN} bytes, got {received}")
            }
            RequestError::UnsupportedVersion { version } => {
                write!(f, "unsupported version: {version}")
            }
            RequestError::UnexpectedMode { mode } => {
                write!(f, "unexpected request mode: {mode:?}")
            }
            RequestError::ZeroTransmitTimestamp => {
                write!(f, "client transmit timestamp is zero")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidListenAddress { address, detail } => {
                write!(f, "invalid listen address {address}: {detail}")
            }
            ConfigError::NotMulticast { group } => {
                write!(f, "{group} is not an IPv4 multicast group")
            }
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Config(e) => Some(e),
        }
    }
}

impl std::error::Error for RequestError {}
impl std::error::Error for ConfigError {}

// ── From conversions ────────────────────────────────────────────────

impl From<ServerError> for io::Error {
    fn from(err: ServerError) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> ServerError {
        ServerError::Config(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
