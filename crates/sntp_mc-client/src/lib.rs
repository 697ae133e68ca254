// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Multicast SNTP client: send one request, take the first matching reply, and report how
far the local clock is off.

# Example
Queries every SNTP server listening on the local subnet's all-hosts group and prints
the offset of the first one to answer.

```rust,no_run
use sntp_client::ClientConfig;

fn main() -> std::io::Result<()> {
    let result = sntp_client::query(&ClientConfig::default())?;
    println!("Clock is off by {} seconds", result.clock_offset);
    println!("server {} (stratum {})", result.server, result.stratum.0);
    Ok(())
}
```

# Feature Flags

| Feature | Default | Description |
|---------|---------|-------------|
| `tokio` | no | Async query using the tokio runtime. |
*/

#![warn(missing_docs)]

// Re-export protocol types from sntp_proto for convenience.
pub use sntp_proto::{clock, protocol, unix_time};

/// Custom error types for programmatic error matching.
pub mod error;

/// Client configuration.
pub mod config;

/// The request/reply state machine.
pub mod exchange;

/// Clock offset arithmetic.
pub mod offset;

/// Datagram transport abstraction.
pub mod transport;

/// Blocking query with retries.
pub mod request;

mod socket_opts;

/// Async query using the Tokio runtime.
///
/// Requires the `tokio` feature flag.
#[cfg(feature = "tokio")]
pub mod async_sntp;

pub use config::ClientConfig;
pub use exchange::{Exchange, ExchangeResult, ExchangeState};
pub use offset::ClockOffset;
pub use request::{query, query_with};
