// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async query against a loopback responder.

#![cfg(feature = "tokio")]

mod common;

use std::io;
use std::time::Duration;

use common::{Behavior, spawn_responder};
use sntp_client::ClientConfig;

#[tokio::test]
async fn test_async_query_matches_blocking_semantics() {
    let responder = spawn_responder(vec![Behavior::Ignore, Behavior::Answer { skew_secs: 3 }]);
    let config = ClientConfig::default()
        .destination(responder.addr.to_string())
        .timeout(Duration::from_millis(300))
        .retries(2)
        .backoff(Duration::from_millis(5));

    let result = sntp_client::async_sntp::query(&config).await.unwrap();
    assert!((result.offset_seconds - 3.0).abs() < 0.5);
    assert_eq!(result.server.ip(), responder.addr.ip());
    assert_eq!(responder.join(), 2);
}

#[tokio::test]
async fn test_async_query_resolve_failure() {
    let config = ClientConfig::default().destination("[::1]:1123");
    let err = sntp_client::async_sntp::query(&config).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}
