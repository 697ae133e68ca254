// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request handling shared by the server loop and its benchmarks.
//!
//! Provides request validation, reply construction, the per-datagram pipeline and
//! server metrics. Nothing here performs I/O.

mod metrics;
mod pipeline;
mod response;
mod state;
mod validation;

pub use self::metrics::{MetricsSnapshot, ServerMetrics};
pub use self::pipeline::{HandleResult, handle_request};
pub use self::response::{build_server_response, serialize_response_with_t3};
pub use self::state::ServerState;

pub(crate) use self::validation::validate_client_request;
