// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but clippy flags them as unreachable outside the crate.
#![allow(unreachable_pub, dead_code)]

use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sntp_proto::protocol::{Mode, Packet, Stratum, Timestamp};

/// How the loopback responder treats each request it receives, in order.
#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    /// Answer with a well-formed reply whose clock is `skew_secs` ahead of the request.
    Answer { skew_secs: u32 },
    /// Swallow the request.
    Ignore,
    /// Answer with a reply whose originate timestamp does not match.
    WrongOrigin,
    /// Answer with a datagram shorter than a packet.
    Truncate,
    /// Send a reply to some earlier request first, then the real answer.
    StaleThenAnswer { skew_secs: u32 },
}

/// A UDP responder on 127.0.0.1 that serves a fixed script and then exits.
pub struct Responder {
    pub addr: SocketAddr,
    handle: JoinHandle<usize>,
}

impl Responder {
    /// Number of requests the responder saw.
    pub fn join(self) -> usize {
        self.handle.join().unwrap()
    }
}

pub fn spawn_responder(script: Vec<Behavior>) -> Responder {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let addr = socket.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut seen = 0;
        let mut buf = [0u8; 512];
        for behavior in script {
            let Ok((len, from)) = socket.recv_from(&mut buf) else {
                break;
            };
            seen += 1;
            let Ok(request) = Packet::from_wire(&buf[..len]) else {
                continue;
            };
            if let Behavior::StaleThenAnswer { skew_secs } = behavior {
                if let Some(stale) = reply_to(&request, Behavior::WrongOrigin) {
                    let _ = socket.send_to(&stale, from);
                }
                if let Some(bytes) = reply_to(&request, Behavior::Answer { skew_secs }) {
                    let _ = socket.send_to(&bytes, from);
                }
                continue;
            }
            let reply = reply_to(&request, behavior);
            if let Some(bytes) = reply {
                let _ = socket.send_to(&bytes, from);
            }
        }
        seen
    });
    Responder { addr, handle }
}

fn reply_to(request: &Packet, behavior: Behavior) -> Option<Vec<u8>> {
    let t1 = request.transmit_timestamp;
    let answer = |originate: Timestamp, skew: u32| Packet {
        mode: Mode::Server,
        stratum: Stratum::PRIMARY,
        poll: request.poll,
        reference_timestamp: Timestamp::new(t1.seconds.wrapping_add(skew), t1.fraction),
        originate_timestamp: originate,
        receive_timestamp: Timestamp::new(t1.seconds.wrapping_add(skew), t1.fraction),
        transmit_timestamp: Timestamp::new(t1.seconds.wrapping_add(skew), t1.fraction),
        ..Packet::default()
    };
    match behavior {
        Behavior::Answer { skew_secs } => Some(answer(t1, skew_secs).to_wire().to_vec()),
        Behavior::Ignore => None,
        Behavior::WrongOrigin => {
            let stale = Timestamp::new(t1.seconds.wrapping_sub(60), t1.fraction);
            Some(answer(stale, 0).to_wire().to_vec())
        }
        Behavior::Truncate => Some(answer(t1, 0).to_wire()[..47].to_vec()),
        Behavior::StaleThenAnswer { skew_secs } => Some(answer(t1, skew_secs).to_wire().to_vec()),
    }
}
