// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not connect to container runtime at {}: {source}", path.display())]
    Transport {
        path: PathBuf,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("{method} failed after {attempts} attempt(s): {status}")]
    Rpc {
        method: &'static str,
        attempts: u32,
        status: Box<tonic::Status>,
    },
}

impl Error {
    /// The gRPC code of the failed call, if the error came from an RPC.
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            Error::Transport { .. } => None,
            Error::Rpc { status, .. } => Some(status.code()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
