// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use clap::Parser;
use dd_cri::socket::{DEFAULT_CRI_SOCKET, DEFAULT_DOCKERSHIM_SOCKET};

#[derive(Parser, Debug, Clone)]
#[command(name = "eni-cleaner")]
#[command(about = "Periodically releases ENI addresses that no running pod sandbox uses", long_about = None)]
pub struct Args {
    /// Time between cleanups (Go duration syntax, e.g. 1h, 30m, 1h30m)
    #[arg(long, default_value = "1h", allow_hyphen_values = true)]
    pub cleanup_period: String,

    /// Upper bound on one cleanup cycle, including discovery retries
    #[arg(long, default_value = "5m", allow_hyphen_values = true)]
    pub cycle_timeout: String,

    /// Preferred container runtime socket
    #[arg(long, default_value = DEFAULT_CRI_SOCKET)]
    pub cri_socket: PathBuf,

    /// Socket used when the preferred one does not exist
    #[arg(long, default_value = DEFAULT_DOCKERSHIM_SOCKET)]
    pub fallback_socket: PathBuf,

    /// Log level (trace, debug, info, warn, error). DD_LOG_LEVEL takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
