// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the SNTP client.
//!
//! Public entry points return `io::Result<T>`. Internally, errors are constructed as
//! [`SntpError`] variants and converted to `io::Error` via `From<SntpError> for io::Error`.
//!
//! Callers who want programmatic error matching can downcast via `io::Error::get_ref()`:
//!
//! ```no_run
//! use sntp_client::error::SntpError;
//!
//! match sntp_client::query(&sntp_client::ClientConfig::default()) {
//!     Ok(result) => println!("Clock is off by {} seconds", result.clock_offset),
//!     Err(e) => {
//!         if let Some(sntp_err) = e.get_ref()
//!             .and_then(|inner| inner.downcast_ref::<SntpError>())
//!         {
//!             match sntp_err {
//!                 SntpError::Timeout(t) => eprintln!("no reply: {t}"),
//!                 _ => eprintln!("SNTP error: {sntp_err}"),
//!             }
//!         }
//!     }
//! }
//! ```

pub use sntp_proto::error::ParseError;

use std::fmt;
use std::io;
use std::time::Duration;

use sntp_proto::protocol::{Mode, Timestamp};

use crate::exchange::ExchangeState;

/// Errors that can occur during SNTP client operations.
#[derive(Debug)]
pub enum SntpError {
    /// Creating, configuring or binding the local socket failed.
    Setup(io::Error),
    /// The destination could not be resolved to an IPv4 socket address.
    Resolve(ResolveError),
    /// Sending or receiving a datagram failed.
    Transport(io::Error),
    /// The reply was not exactly one 48-byte packet.
    Malformed(ParseError),
    /// The reply was well-formed but does not belong to this exchange.
    Protocol(ProtocolError),
    /// No acceptable reply arrived within the configured attempts.
    Timeout(TimeoutError),
}

/// Destination lookup failure.
#[derive(Debug)]
pub struct ResolveError {
    /// The destination string that failed to resolve.
    pub address: String,
    /// The resolver error, if the lookup itself failed.
    pub source: Option<io::Error>,
}

/// Exchange validation errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProtocolError {
    /// The reply's originate timestamp does not echo our transmit timestamp.
    OriginMismatch {
        /// Transmit timestamp of our request.
        expected: Timestamp,
        /// Originate timestamp carried by the reply.
        received: Timestamp,
    },
    /// The reply's mode is not Server.
    UnexpectedMode {
        /// Mode carried by the reply.
        mode: Mode,
    },
    /// A unicast reply came from a host other than the one we asked.
    UnexpectedSource,
    /// An exchange step was invoked out of order.
    InvalidState {
        /// State the step requires.
        expected: ExchangeState,
        /// State the exchange was in.
        actual: ExchangeState,
    },
}

/// Every attempt ended without an acceptable reply.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeoutError {
    /// Number of requests sent.
    pub attempts: u32,
    /// Receive timeout applied to each attempt.
    pub per_attempt: Duration,
    /// Why the most recent discarded reply was rejected, if any reply arrived at all.
    pub last_rejection: Option<ProtocolError>,
}

impl SntpError {
    /// Whether a fresh exchange may succeed where this one failed.
    ///
    /// Receive timeouts and replies that do not belong to the outstanding request are
    /// retried; socket, resolution and send failures are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            SntpError::Transport(e) => is_timeout(e),
            SntpError::Protocol(e) => e.is_stray_reply(),
            _ => false,
        }
    }
}

impl ProtocolError {
    /// Whether a well-formed datagram was rejected because it belongs to some other
    /// exchange. Such replies are discarded and the attempt keeps listening.
    pub fn is_stray_reply(&self) -> bool {
        matches!(
            self,
            ProtocolError::OriginMismatch { .. }
                | ProtocolError::UnexpectedMode { .. }
                | ProtocolError::UnexpectedSource
        )
    }
}

pub(crate) fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for SntpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SntpError::Setup(e) => write!(f, "socket setup failed: {e}"),
            SntpError::Resolve(e) => write!(f, "{e}"),
            SntpError::Transport(e) => write!(f, "transport error: {e}"),
            SntpError::Malformed(e) => write!(f, "{e}"),
            SntpError::Protocol(e) => write!(f, "SNTP protocol error: {e}"),
            SntpError::Timeout(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(e) => write!(f, "cannot resolve {}: {e}", self.address),
            None => write!(f, "{} resolved to no IPv4 addresses", self.address),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::OriginMismatch { expected, received } => write!(
                f,
                "originate timestamp {received} does not match request {expected}"
            ),
            ProtocolError::UnexpectedMode { mode } => {
                write!(f, "unexpected reply mode {mode:?} (expected Server)")
            }
            ProtocolError::UnexpectedSource => write!(f, "reply from unexpected source address"),
            ProtocolError::InvalidState { expected, actual } => {
                write!(f, "exchange is {actual}, step requires {expected}")
            }
        }
    }
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no acceptable reply after {} attempt(s) of {:?} each",
            self.attempts, self.per_attempt
        )?;
        if let Some(rejection) = &self.last_rejection {
            write!(f, " (last reply rejected: {rejection})")?;
        }
        Ok(())
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for SntpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SntpError::Setup(e) | SntpError::Transport(e) => Some(e),
            SntpError::Resolve(e) => e
                .source
                .as_ref()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            SntpError::Malformed(e) => Some(e),
            SntpError::Protocol(e) => Some(e),
            SntpError::Timeout(e) => Some(e),
        }
    }
}

impl std::error::Error for ResolveError {}
impl std::error::Error for ProtocolError {}
impl std::error::Error for TimeoutError {}

// ── From conversions ────────────────────────────────────────────────

impl From<SntpError> for io::Error {
    fn from(err: SntpError) -> io::Error {
        let kind = match &err {
            SntpError::Setup(e) | SntpError::Transport(e) => e.kind(),
            SntpError::Resolve(_) => io::ErrorKind::InvalidInput,
            SntpError::Malformed(_) | SntpError::Protocol(_) => io::ErrorKind::InvalidData,
            SntpError::Timeout(_) => io::ErrorKind::TimedOut,
        };
        io::Error::new(kind, err)
    }
}

impl From<ParseError> for SntpError {
    fn from(err: ParseError) -> SntpError {
        SntpError::Malformed(err)
    }
}

impl From<ProtocolError> for SntpError {
    fn from(err: ProtocolError) -> SntpError {
        SntpError::Protocol(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let e = TimeoutError {
            attempts: 4,
            per_attempt: Duration::from_secs(5),
            last_rejection: None,
        };
        assert_eq!(
            e.to_string(),
            "no acceptable reply after 4 attempt(s) of 5s each"
        );

        let e = TimeoutError {
            last_rejection: Some(ProtocolError::UnexpectedSource),
            ..e
        };
        assert_eq!(
            e.to_string(),
            "no acceptable reply after 4 attempt(s) of 5s each \
             (last reply rejected: reply from unexpected source address)"
        );
    }

    #[test]
    fn test_resolve_display() {
        let e = ResolveError {
            address: "[::1]:1123".into(),
            source: None,
        };
        assert_eq!(e.to_string(), "[::1]:1123 resolved to no IPv4 addresses");
    }

    #[test]
    fn test_error_to_io_error_kind() {
        let cases: Vec<(SntpError, io::ErrorKind)> = vec![
            (
                SntpError::Setup(io::Error::new(io::ErrorKind::AddrInUse, "in use")),
                io::ErrorKind::AddrInUse,
            ),
            (
                SntpError::Resolve(ResolveError {
                    address: "nowhere".into(),
                    source: None,
                }),
                io::ErrorKind::InvalidInput,
            ),
            (
                SntpError::Malformed(ParseError::WrongLength {
                    expected: 48,
                    actual: 3,
                }),
                io::ErrorKind::InvalidData,
            ),
            (
                SntpError::Protocol(ProtocolError::UnexpectedSource),
                io::ErrorKind::InvalidData,
            ),
            (
                SntpError::Timeout(TimeoutError {
                    attempts: 1,
                    per_attempt: Duration::from_millis(10),
                    last_rejection: None,
                }),
                io::ErrorKind::TimedOut,
            ),
        ];
        for (err, expected_kind) in cases {
            let io_err: io::Error = err.into();
            assert_eq!(io_err.kind(), expected_kind);
        }
    }

    #[test]
    fn test_downcast_roundtrip() {
        let err = SntpError::Protocol(ProtocolError::OriginMismatch {
            expected: Timestamp::new(1, 0),
            received: Timestamp::new(2, 0),
        });
        let io_err: io::Error = err.into();
        let inner = io_err
            .get_ref()
            .unwrap()
            .downcast_ref::<SntpError>()
            .unwrap();
        assert!(matches!(
            inner,
            SntpError::Protocol(ProtocolError::OriginMismatch { .. })
        ));
    }

    #[test]
    fn test_retry_classification() {
        let timed_out = SntpError::Transport(io::Error::new(io::ErrorKind::WouldBlock, "t"));
        assert!(timed_out.is_retryable());
        let refused = SntpError::Transport(io::Error::new(io::ErrorKind::PermissionDenied, "p"));
        assert!(!refused.is_retryable());
        assert!(SntpError::Protocol(ProtocolError::UnexpectedSource).is_retryable());
        assert!(
            !SntpError::Protocol(ProtocolError::InvalidState {
                expected: ExchangeState::Idle,
                actual: ExchangeState::OffsetComputed,
            })
            .is_retryable()
        );
        assert!(
            !SntpError::Malformed(ParseError::WrongLength {
                expected: 48,
                actual: 1
            })
            .is_retryable()
        );
    }

    #[test]
    fn test_stray_reply_classification() {
        assert!(ProtocolError::UnexpectedSource.is_stray_reply());
        assert!(ProtocolError::UnexpectedMode { mode: Mode::Client }.is_stray_reply());
        assert!(
            ProtocolError::OriginMismatch {
                expected: Timestamp::new(1, 0),
                received: Timestamp::new(2, 0),
            }
            .is_stray_reply()
        );
        assert!(
            !ProtocolError::InvalidState {
                expected: ExchangeState::RequestSent,
                actual: ExchangeState::Idle,
            }
            .is_stray_reply()
        );
    }
}
