// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for buffer-based SNTP packet parsing and serialization.
//!
//! [`ParseError`] uses no heap allocation and converts into [`std::io::Error`] so
//! transport code can propagate it with `?`.

use core::fmt;

/// Errors that can occur during buffer-based SNTP packet parsing or serialization.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The buffer is too short for the expected data.
    BufferTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// A datagram did not have the exact size of an SNTP packet.
    WrongLength {
        /// Number of bytes a packet occupies on the wire.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "buffer too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            ParseError::WrongLength { expected, actual } => {
                write!(
                    f,
                    "malformed packet: expected exactly {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl From<ParseError> for std::io::Error {
    fn from(err: ParseError) -> std::io::Error {
        let kind = match &err {
            ParseError::BufferTooShort { .. } => std::io::ErrorKind::UnexpectedEof,
            ParseError::WrongLength { .. } => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_buffer_too_short() {
        let err = ParseError::BufferTooShort {
            needed: 48,
            available: 10,
        };
        assert_eq!(err.to_string(), "buffer too short: needed 48 bytes, got 10");
    }

    #[test]
    fn test_display_wrong_length() {
        let err = ParseError::WrongLength {
            expected: 48,
            actual: 100,
        };
        assert_eq!(
            err.to_string(),
            "malformed packet: expected exactly 48 bytes, got 100"
        );
    }

    #[test]
    fn test_into_io_error() {
        let parse_err = ParseError::BufferTooShort {
            needed: 48,
            available: 0,
        };
        let io_err: std::io::Error = parse_err.into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::UnexpectedEof);

        let io_err: std::io::Error = ParseError::WrongLength {
            expected: 48,
            actual: 10,
        }
        .into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::InvalidData);
        let inner = io_err
            .get_ref()
            .and_then(|e| e.downcast_ref::<ParseError>())
            .unwrap();
        assert!(matches!(inner, ParseError::WrongLength { actual: 10, .. }));
    }
}
