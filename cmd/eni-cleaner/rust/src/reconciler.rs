// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use dd_cri::SandboxRecord;
use log::{debug, info};

/// Consumer of each cycle's sandbox snapshot.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn reconcile(&self, sandboxes: &[SandboxRecord]) -> Result<()>;
}

/// Reports what is running without releasing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReconciler;

/// Number of distinct sandbox ids and of addresses in a snapshot.
pub fn summarize(sandboxes: &[SandboxRecord]) -> (usize, usize) {
    let ids: HashSet<&str> = sandboxes.iter().map(|s| s.id.as_str()).collect();
    (ids.len(), sandboxes.len())
}

#[async_trait]
impl Reconciler for LoggingReconciler {
    async fn reconcile(&self, sandboxes: &[SandboxRecord]) -> Result<()> {
        let (ids, addresses) = summarize(sandboxes);
        info!("{ids} running pod sandboxes hold {addresses} addresses");
        for sandbox in sandboxes {
            debug!("Sandbox {} uses {:?}", sandbox.id, sandbox.ip);
        }
        Ok(())
    }
}
