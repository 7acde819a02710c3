// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! In-process CRI runtime serving scripted sandboxes on a Unix socket.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dd_cri::proto::runtime_service_server::{RuntimeService, RuntimeServiceServer};
use dd_cri::proto::{
    LinuxPodSandboxStatus, ListPodSandboxRequest, ListPodSandboxResponse, Namespace,
    NamespaceMode, NamespaceOption, PodIp, PodSandbox, PodSandboxFilter, PodSandboxNetworkStatus,
    PodSandboxState, PodSandboxStatus, PodSandboxStatusRequest, PodSandboxStatusResponse,
};
use dd_cri::{DiscoveryConfig, RetryPolicy};
use tokio::net::UnixListener;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

#[derive(Default)]
pub struct FakeRuntime {
    sandboxes: Mutex<Vec<PodSandbox>>,
    statuses: Mutex<HashMap<String, PodSandboxStatus>>,
    list_errors: Mutex<VecDeque<Status>>,
    status_errors: Mutex<HashMap<String, Status>>,
    pub list_calls: AtomicU32,
    pub status_calls: AtomicU32,
    pub last_filter: Mutex<Option<PodSandboxFilter>>,
}

impl FakeRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a sandbox returned by the list call along with its status.
    pub fn add_sandbox(&self, id: &str, status: PodSandboxStatus) {
        self.sandboxes.lock().unwrap().push(PodSandbox {
            id: id.to_string(),
            state: PodSandboxState::SandboxReady as i32,
            ..Default::default()
        });
        self.statuses
            .lock()
            .unwrap()
            .insert(id.to_string(), PodSandboxStatus { id: id.to_string(), ..status });
    }

    /// Queue errors returned by the next list calls, one per call.
    pub fn fail_list_with(&self, errors: impl IntoIterator<Item = Status>) {
        self.list_errors.lock().unwrap().extend(errors);
    }

    /// Make every status call for `id` fail with `status`.
    pub fn fail_status_with(&self, id: &str, status: Status) {
        self.status_errors
            .lock()
            .unwrap()
            .insert(id.to_string(), status);
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

struct FakeRuntimeService(Arc<FakeRuntime>);

#[tonic::async_trait]
impl RuntimeService for FakeRuntimeService {
    async fn pod_sandbox_status(
        &self,
        request: Request<PodSandboxStatusRequest>,
    ) -> Result<Response<PodSandboxStatusResponse>, Status> {
        self.0.status_calls.fetch_add(1, Ordering::SeqCst);
        let id = request.into_inner().pod_sandbox_id;

        if let Some(status) = self.0.status_errors.lock().unwrap().get(&id) {
            return Err(status.clone());
        }

        let status = self
            .0
            .statuses
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("sandbox {id} not found")))?;

        Ok(Response::new(PodSandboxStatusResponse {
            status: Some(status),
            info: HashMap::new(),
        }))
    }

    async fn list_pod_sandbox(
        &self,
        request: Request<ListPodSandboxRequest>,
    ) -> Result<Response<ListPodSandboxResponse>, Status> {
        self.0.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.0.last_filter.lock().unwrap() = request.into_inner().filter;

        if let Some(status) = self.0.list_errors.lock().unwrap().pop_front() {
            return Err(status);
        }

        Ok(Response::new(ListPodSandboxResponse {
            items: self.0.sandboxes.lock().unwrap().clone(),
        }))
    }
}

/// Bind `socket` and serve `runtime` on it until the returned task is aborted.
pub fn serve(runtime: Arc<FakeRuntime>, socket: &Path) -> JoinHandle<()> {
    let listener = UnixListener::bind(socket)
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", socket.display()));
    let incoming = UnixListenerStream::new(listener);

    tokio::spawn(async move {
        Server::builder()
            .add_service(RuntimeServiceServer::new(FakeRuntimeService(runtime)))
            .serve_with_incoming(incoming)
            .await
            .expect("fake runtime server failed");
    })
}

pub fn pod_status(state: PodSandboxState, mode: NamespaceMode, ips: &[&str]) -> PodSandboxStatus {
    let (primary, additional) = ips.split_first().map_or(("", &[][..]), |(p, a)| (*p, a));
    PodSandboxStatus {
        state: state as i32,
        network: Some(PodSandboxNetworkStatus {
            ip: primary.to_string(),
            additional_ips: additional
                .iter()
                .map(|ip| PodIp { ip: ip.to_string() })
                .collect(),
        }),
        linux: Some(LinuxPodSandboxStatus {
            namespaces: Some(Namespace {
                options: Some(NamespaceOption {
                    network: mode as i32,
                    ..Default::default()
                }),
            }),
        }),
        ..Default::default()
    }
}

pub fn ready_pod(ips: &[&str]) -> PodSandboxStatus {
    pod_status(PodSandboxState::SandboxReady, NamespaceMode::Pod, ips)
}

/// Discovery config pointing at sockets in `dir`, with a retry policy fast
/// enough for tests.
pub fn test_config(dir: &Path) -> DiscoveryConfig {
    DiscoveryConfig {
        primary_socket: primary_socket(dir),
        fallback_socket: fallback_socket(dir),
        retry: RetryPolicy {
            base_delay: Duration::from_millis(1),
            ..RetryPolicy::default()
        },
        connect_timeout: Duration::from_secs(5),
        request_timeout: Some(Duration::from_secs(5)),
    }
}

pub fn primary_socket(dir: &Path) -> PathBuf {
    dir.join("cri.sock")
}

pub fn fallback_socket(dir: &Path) -> PathBuf {
    dir.join("dockershim.sock")
}
