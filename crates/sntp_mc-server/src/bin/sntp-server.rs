// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP server daemon.
//!
//! Binds once and answers client requests until interrupted.
//!
//! Run with:
//!   RUST_LOG=info sntp-server
//!   RUST_LOG=sntp_server=debug sntp-server --listen 0.0.0.0:1123 --join-multicast 239.255.11.23

use std::net::Ipv4Addr;
use std::process::ExitCode;

use clap::Parser;
use sntp_server::protocol::Stratum;
use sntp_server::server::SntpServer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "sntp-server")]
#[command(about = "Answer SNTP client requests on a multicast group or unicast address")]
#[command(version)]
struct Cli {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:1123")]
    listen: String,

    /// Stratum claimed in replies
    #[arg(short, long, default_value_t = 1)]
    stratum: u8,

    /// IPv4 multicast group to join (224.0.0.1 needs no explicit join)
    #[arg(short = 'j', long)]
    join_multicast: Option<Ipv4Addr>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let mut builder = SntpServer::builder()
        .listen(cli.listen.clone())
        .stratum(Stratum(cli.stratum));
    if let Some(group) = cli.join_multicast {
        builder = builder.join_multicast(group);
    }

    let server = match builder.build().await {
        Ok(server) => server,
        Err(e) => {
            error!(listen = %cli.listen, "cannot start server: {e}");
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("server stopped: {e}");
                return ExitCode::FAILURE;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
        }
    }
    ExitCode::SUCCESS
}
