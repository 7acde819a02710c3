// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use clap::Parser;
use dd_cri::socket::{DEFAULT_CRI_SOCKET, DEFAULT_DOCKERSHIM_SOCKET};
use dd_cri::{CriClient, DiscoveryConfig, SandboxApi};
use eni_cleaner::config;

#[derive(Parser, Debug)]
#[command(name = "cri-sandboxes")]
#[command(about = "Lists the running pod sandboxes and their IPs as JSON", long_about = None)]
struct Args {
    /// Preferred container runtime socket
    #[arg(long, default_value = DEFAULT_CRI_SOCKET)]
    cri_socket: PathBuf,

    /// Socket used when the preferred one does not exist
    #[arg(long, default_value = DEFAULT_DOCKERSHIM_SOCKET)]
    fallback_socket: PathBuf,

    /// Log level. DD_LOG_LEVEL takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = simple_logger::init_with_level(config::log_level(&args.log_level)) {
        eprintln!("Error initializing logger: {}", e);
    }

    let client = CriClient::new(DiscoveryConfig {
        primary_socket: args.cri_socket,
        fallback_socket: args.fallback_socket,
        ..DiscoveryConfig::default()
    });

    let records = match client.running_sandboxes().await {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&records) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing sandboxes: {}", e);
            std::process::exit(1);
        }
    }
}
