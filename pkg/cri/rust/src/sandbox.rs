// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

use serde::Serialize;

use crate::proto::{NamespaceMode, PodSandboxState, PodSandboxStatus};

/// One IP address of a running pod sandbox. A sandbox with several addresses
/// produces one record per address, all with the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SandboxRecord {
    pub id: String,
    pub ip: String,
}

/// Why a listed sandbox produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The sandbox left the ready state between the list and status calls.
    NotReady(i32),
    /// The sandbox does not own its network namespace (host network, ...).
    NonPodNetwork(i32),
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Skip::NotReady(state) => match PodSandboxState::try_from(state) {
                Ok(state) => write!(f, "unready state {}", state.as_str_name()),
                Err(_) => write!(f, "unknown state {state}"),
            },
            Skip::NonPodNetwork(mode) => match NamespaceMode::try_from(mode) {
                Ok(mode) => write!(f, "non-pod netns mode {}", mode.as_str_name()),
                Err(_) => write!(f, "unknown netns mode {mode}"),
            },
        }
    }
}

/// Network mode of the sandbox. Missing sub-messages read as the protobuf
/// default, which is `POD`.
fn network_mode(status: &PodSandboxStatus) -> i32 {
    status
        .linux
        .as_ref()
        .and_then(|linux| linux.namespaces.as_ref())
        .and_then(|namespaces| namespaces.options.as_ref())
        .map(|options| options.network)
        .unwrap_or(NamespaceMode::Pod as i32)
}

/// Addresses of a ready, pod-namespaced sandbox: the primary IP first, then
/// the additional ones in runtime order.
///
/// The primary IP is kept even when empty.
pub fn sandbox_ips(status: &PodSandboxStatus) -> Result<Vec<String>, Skip> {
    if status.state != PodSandboxState::SandboxReady as i32 {
        return Err(Skip::NotReady(status.state));
    }

    let mode = network_mode(status);
    if mode != NamespaceMode::Pod as i32 {
        return Err(Skip::NonPodNetwork(mode));
    }

    let Some(network) = status.network.as_ref() else {
        return Ok(vec![String::new()]);
    };

    let mut ips = Vec::with_capacity(1 + network.additional_ips.len());
    ips.push(network.ip.clone());
    ips.extend(network.additional_ips.iter().map(|pod_ip| pod_ip.ip.clone()));
    Ok(ips)
}

/// Flatten a sandbox into one record per address.
pub fn sandbox_records(id: &str, status: &PodSandboxStatus) -> Result<Vec<SandboxRecord>, Skip> {
    Ok(sandbox_ips(status)?
        .into_iter()
        .map(|ip| SandboxRecord {
            id: id.to_string(),
            ip,
        })
        .collect())
}
