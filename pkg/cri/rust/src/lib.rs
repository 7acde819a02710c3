// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Discovery of the pod sandboxes running on a node, read from the container
//! runtime over its CRI socket.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

mod client;
mod error;
pub mod retry;
mod sandbox;
pub mod socket;

/// Generated CRI `runtime.v1alpha2` messages and service stubs.
#[allow(clippy::all)]
pub mod proto {
    tonic::include_proto!("runtime.v1alpha2");
}

pub use client::{CriClient, DiscoveryConfig, SandboxApi};
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use sandbox::{SandboxRecord, Skip, sandbox_ips, sandbox_records};
