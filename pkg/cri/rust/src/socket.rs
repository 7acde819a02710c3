// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hyper_util::rt::TokioIo;
use log::debug;
use tokio::net::UnixStream;
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;

use crate::error::{Error, Result};

pub const DEFAULT_CRI_SOCKET: &str = "/var/run/cri.sock";
pub const DEFAULT_DOCKERSHIM_SOCKET: &str = "/var/run/dockershim.sock";

// Placeholder authority, the connector below ignores it and dials the socket.
const UNIX_ENDPOINT_URI: &str = "http://[::]:50051";

/// Pick the runtime socket: the primary path when it exists and is not a
/// directory, the fallback path otherwise.
///
/// The fallback is returned without being checked, so a missing runtime shows
/// up as a connection error on the fallback path.
pub fn select_socket<'a>(primary: &'a Path, fallback: &'a Path) -> &'a Path {
    match std::fs::metadata(primary) {
        Ok(meta) if !meta.is_dir() => primary,
        _ => fallback,
    }
}

/// Dial a gRPC channel over a Unix socket. Waits for the connection to be
/// established instead of connecting lazily on the first request.
pub async fn connect(
    path: &Path,
    connect_timeout: Duration,
    request_timeout: Option<Duration>,
) -> Result<Channel> {
    let transport_error = |source| Error::Transport {
        path: path.to_path_buf(),
        source,
    };

    let mut endpoint = Endpoint::try_from(UNIX_ENDPOINT_URI)
        .map_err(transport_error)?
        .connect_timeout(connect_timeout);
    if let Some(timeout) = request_timeout {
        endpoint = endpoint.timeout(timeout);
    }

    debug!("connecting to container runtime on unix://{}", path.display());

    let socket_path: PathBuf = path.to_path_buf();
    endpoint
        .connect_with_connector(service_fn(move |_: Uri| {
            let socket_path = socket_path.clone();
            async move {
                let stream = UnixStream::connect(socket_path).await?;
                Ok::<_, std::io::Error>(TokioIo::new(stream))
            }
        }))
        .await
        .map_err(transport_error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::net::UnixListener;
    use tempfile::TempDir;

    #[test]
    fn test_primary_socket_preferred_when_both_exist() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("cri.sock");
        let fallback = dir.path().join("dockershim.sock");
        let _l1 = UnixListener::bind(&primary).unwrap();
        let _l2 = UnixListener::bind(&fallback).unwrap();

        assert_eq!(select_socket(&primary, &fallback), primary.as_path());
    }

    #[test]
    fn test_fallback_when_primary_missing() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("cri.sock");
        let fallback = dir.path().join("dockershim.sock");
        let _l = UnixListener::bind(&fallback).unwrap();

        assert_eq!(select_socket(&primary, &fallback), fallback.as_path());
    }

    #[test]
    fn test_fallback_when_primary_is_directory() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("cri.sock");
        let fallback = dir.path().join("dockershim.sock");
        fs::create_dir(&primary).unwrap();

        assert_eq!(select_socket(&primary, &fallback), fallback.as_path());
    }

    #[test]
    fn test_fallback_returned_even_if_missing() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("cri.sock");
        let fallback = dir.path().join("dockershim.sock");

        assert_eq!(select_socket(&primary, &fallback), fallback.as_path());
    }

    #[tokio::test]
    async fn test_connect_missing_socket_is_transport_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.sock");

        let err = connect(&path, Duration::from_secs(1), None)
            .await
            .unwrap_err();
        match err {
            Error::Transport { path: p, .. } => assert_eq!(p, path),
            other => unreachable!("expected transport error, got {other:?}"),
        }
    }
}
