// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tonic::transport::Channel;

use crate::error::Result;
use crate::proto::runtime_service_client::RuntimeServiceClient;
use crate::proto::{
    ListPodSandboxRequest, PodSandboxFilter, PodSandboxState, PodSandboxStateValue,
    PodSandboxStatusRequest,
};
use crate::retry::RetryPolicy;
use crate::sandbox::{SandboxRecord, sandbox_records};
use crate::socket::{DEFAULT_CRI_SOCKET, DEFAULT_DOCKERSHIM_SOCKET, connect, select_socket};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of the pod sandboxes currently running on the node.
#[async_trait]
pub trait SandboxApi: Send + Sync {
    /// Ready, pod-namespaced sandboxes, one record per sandbox IP.
    async fn running_sandboxes(&self) -> Result<Vec<SandboxRecord>>;
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub primary_socket: PathBuf,
    pub fallback_socket: PathBuf,
    pub retry: RetryPolicy,
    pub connect_timeout: Duration,
    /// Deadline sent with every RPC. `None` leaves calls unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            primary_socket: PathBuf::from(DEFAULT_CRI_SOCKET),
            fallback_socket: PathBuf::from(DEFAULT_DOCKERSHIM_SOCKET),
            retry: RetryPolicy::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// CRI client. Holds no connection: every discovery dials the runtime and the
/// channel is dropped before returning.
#[derive(Debug, Clone, Default)]
pub struct CriClient {
    config: DiscoveryConfig,
}

impl CriClient {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub async fn discover(&self) -> Result<Vec<SandboxRecord>> {
        let socket = select_socket(&self.config.primary_socket, &self.config.fallback_socket);
        debug!("Getting running pod sandboxes from {}", socket.display());

        let channel = connect(
            socket,
            self.config.connect_timeout,
            self.config.request_timeout,
        )
        .await?;
        self.discover_on(channel).await
    }

    async fn discover_on(&self, channel: Channel) -> Result<Vec<SandboxRecord>> {
        let client = RuntimeServiceClient::new(channel);
        let retry = &self.config.retry;

        let list_request = ListPodSandboxRequest {
            filter: Some(PodSandboxFilter {
                state: Some(PodSandboxStateValue {
                    state: PodSandboxState::SandboxReady as i32,
                }),
                ..Default::default()
            }),
        };
        let sandboxes = retry
            .call("ListPodSandbox", || {
                let mut client = client.clone();
                let request = list_request.clone();
                async move {
                    client
                        .list_pod_sandbox(request)
                        .await
                        .map(tonic::Response::into_inner)
                }
            })
            .await?
            .items;

        let mut records = Vec::with_capacity(sandboxes.len());
        for sandbox in sandboxes {
            let status_request = PodSandboxStatusRequest {
                pod_sandbox_id: sandbox.id.clone(),
                verbose: false,
            };
            let status = retry
                .call("PodSandboxStatus", || {
                    let mut client = client.clone();
                    let request = status_request.clone();
                    async move {
                        client
                            .pod_sandbox_status(request)
                            .await
                            .map(tonic::Response::into_inner)
                    }
                })
                .await?
                .status
                .unwrap_or_default();

            match sandbox_records(&sandbox.id, &status) {
                Ok(found) => records.extend(found),
                Err(skip) => debug!("Ignoring sandbox {}: {skip}", sandbox.id),
            }
        }

        debug!("Found {} running pod sandbox address(es)", records.len());
        Ok(records)
    }
}

#[async_trait]
impl SandboxApi for CriClient {
    async fn running_sandboxes(&self) -> Result<Vec<SandboxRecord>> {
        self.discover().await
    }
}
