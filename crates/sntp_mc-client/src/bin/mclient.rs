// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Multicast SNTP client.
//!
//! Sends one request to the all-hosts group (or `--destination`) and prints the offset
//! reported by the first server to answer.
//!
//! Usage:
//!   mclient
//!   mclient --destination 192.0.2.10:1123 --timeout 1000 --retries 0
//!
//! Set `RUST_LOG=debug` to trace the exchange.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use sntp_client::ClientConfig;
use sntp_client::error::SntpError;

#[derive(Parser)]
#[command(name = "mclient")]
#[command(about = "Query SNTP servers on a multicast group and print the local clock offset")]
#[command(version)]
struct Cli {
    /// Destination host:port (multicast group or unicast server)
    #[arg(short, long, default_value = "224.0.0.1:1123")]
    destination: String,

    /// Per-attempt receive timeout in milliseconds (at least 1)
    #[arg(short, long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Retries after the first attempt
    #[arg(short, long, default_value_t = 3)]
    retries: u32,

    /// Delay before the first retry in milliseconds; doubles per retry
    #[arg(short, long, default_value_t = 250)]
    backoff: u64,
}

impl Cli {
    fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .destination(self.destination.clone())
            .timeout(Duration::from_millis(self.timeout))
            .retries(self.retries)
            .backoff(Duration::from_millis(self.backoff))
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match sntp_client::query(&cli.config()) {
        Ok(result) => {
            println!("Clock is off by {} seconds", result.clock_offset);
            log::debug!(
                "server {} stratum {} offset {:.6}s delay {:.6}s",
                result.server,
                result.stratum.0,
                result.offset_seconds,
                result.delay_seconds
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.get_ref().and_then(|inner| inner.downcast_ref::<SntpError>()) {
                Some(SntpError::Setup(inner)) => eprintln!("mclient: cannot open socket: {inner}"),
                Some(SntpError::Timeout(t)) => eprintln!("mclient: {t}"),
                Some(sntp_err) => eprintln!("mclient: {sntp_err}"),
                None => eprintln!("mclient: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library() {
        let cli = Cli::try_parse_from(["mclient"]).unwrap();
        assert_eq!(cli.config(), ClientConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "mclient",
            "--destination",
            "127.0.0.1:9123",
            "--timeout",
            "100",
            "--retries",
            "0",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.destination, "127.0.0.1:9123");
        assert_eq!(config.timeout, Duration::from_millis(100));
        assert_eq!(config.attempts(), 1);
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = Cli::try_parse_from(["mclient", "--timeout", "0"])
            .err()
            .unwrap();
        assert!(err.use_stderr());
        assert!(Cli::try_parse_from(["mclient", "--timeout", "1"]).is_ok());
    }

    #[test]
    fn positional_arguments_rejected() {
        let err = Cli::try_parse_from(["mclient", "extra"]).err().unwrap();
        assert!(err.use_stderr());
    }
}
