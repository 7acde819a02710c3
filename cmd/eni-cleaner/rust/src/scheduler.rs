// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Periodic cleanup loop: discover the running sandboxes, hand them to the
//! reconciler, wait for the next tick.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use dd_cri::SandboxApi;
use log::{info, warn};
use tokio::time::{MissedTickBehavior, interval, timeout};

use crate::reconciler::Reconciler;

/// Outcome of a `run_periodic` loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Cycles that ran to completion or timed out.
    pub cycles: u64,
    /// Of those, cycles that ended in an error or a timeout.
    pub failed: u64,
}

async fn run_cycle(api: &dyn SandboxApi, reconciler: &dyn Reconciler) -> Result<()> {
    let sandboxes = api
        .running_sandboxes()
        .await
        .context("failed to get running pod sandboxes")?;
    reconciler
        .reconcile(&sandboxes)
        .await
        .context("failed to reconcile pod sandboxes")
}

/// Run a cycle now and then every `period` until `shutdown` resolves.
///
/// A cycle longer than `period` delays the next one instead of causing a burst.
/// Failures are logged and never end the loop.
pub async fn run_periodic<F>(
    period: Duration,
    cycle_timeout: Duration,
    api: &dyn SandboxApi,
    reconciler: &dyn Reconciler,
    shutdown: F,
) -> CycleStats
where
    F: Future<Output = ()>,
{
    let mut shutdown = std::pin::pin!(shutdown);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stats = CycleStats::default();

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown requested during a cleanup cycle, abandoning it");
                break;
            }
            outcome = timeout(cycle_timeout, run_cycle(api, reconciler)) => outcome,
        };

        stats.cycles += 1;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                stats.failed += 1;
                warn!("Cleanup cycle failed: {e:#}");
            }
            Err(_) => {
                stats.failed += 1;
                warn!("Cleanup cycle timed out after {cycle_timeout:?}");
            }
        }
    }

    stats
}
