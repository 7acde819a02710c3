// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use clap::Parser;
use dd_cri::CriClient;
use eni_cleaner::cli::Args;
use eni_cleaner::config::{self, Config, STATUS_INVALID_ARGUMENTS};
use eni_cleaner::reconciler::LoggingReconciler;
use eni_cleaner::scheduler::run_periodic;
use log::{error, info};
use tokio::signal::unix::{SignalKind, signal};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(config::log_level(&args.log_level))?;

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(STATUS_INVALID_ARGUMENTS);
        }
    };

    info!(
        "eni-cleaner starting (version {}), cleanup period {:?}",
        env!("CARGO_PKG_VERSION"),
        config.cleanup_period
    );

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
    };

    let client = CriClient::new(config.discovery.clone());
    let stats = run_periodic(
        config.cleanup_period,
        config.cycle_timeout,
        &client,
        &LoggingReconciler,
        shutdown,
    )
    .await;

    info!(
        "eni-cleaner shutting down after {} cycles ({} failed)",
        stats.cycles, stats.failed
    );
    Ok(())
}
