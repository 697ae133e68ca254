// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for server integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sntp_server::protocol::{PACKET_LEN, Packet, Timestamp};
use sntp_server::server::SntpServerBuilder;
use sntp_server::server_common::ServerMetrics;
use tokio::net::UdpSocket;

/// Spawn a test server on an ephemeral loopback port and return its address and metrics.
///
/// The server runs in a background tokio task. It will shut down when the tokio runtime
/// is dropped.
pub(crate) async fn spawn_test_server(builder: SntpServerBuilder) -> (SocketAddr, Arc<ServerMetrics>) {
    let metrics = Arc::new(ServerMetrics::new());
    let server = builder
        .listen("127.0.0.1:0")
        .metrics(metrics.clone())
        .build()
        .await
        .expect("failed to bind test server");
    let addr = server.local_addr().expect("failed to get local addr");
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    // Small yield to ensure the server task is running.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, metrics)
}

/// Build a client request (48 bytes) with the given transmit timestamp.
pub(crate) fn build_client_packet(transmit: Timestamp) -> [u8; PACKET_LEN] {
    Packet {
        poll: 6,
        transmit_timestamp: transmit,
        ..Packet::default()
    }
    .to_wire()
}

/// Send a raw UDP packet to `addr` and receive the response with a timeout.
///
/// Returns `None` if the server doesn't respond within the timeout.
pub(crate) async fn send_receive_raw(
    addr: SocketAddr,
    packet: &[u8],
    timeout: Duration,
) -> Option<Vec<u8>> {
    let sock = UdpSocket::bind("127.0.0.1:0").await.expect("bind failed");
    sock.send_to(packet, addr).await.expect("send failed");

    let mut buf = [0u8; 1024];
    match tokio::time::timeout(timeout, sock.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => Some(buf[..len].to_vec()),
        _ => None,
    }
}
