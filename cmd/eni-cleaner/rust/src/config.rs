// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::env;
use std::time::Duration;

use dd_cri::DiscoveryConfig;
use thiserror::Error;

use crate::cli::Args;
use crate::duration::{DurationError, parse_duration};

/// Exit status used when the process refuses to start because of its arguments.
pub const STATUS_INVALID_ARGUMENTS: i32 = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--{flag} must be greater than zero (specified: {value})")]
    NotPositive { flag: &'static str, value: String },
    #[error("invalid --{flag}: {source}")]
    InvalidDuration {
        flag: &'static str,
        #[source]
        source: DurationError,
    },
}

/// Process configuration, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub cleanup_period: Duration,
    pub cycle_timeout: Duration,
    pub discovery: DiscoveryConfig,
}

fn positive_duration(flag: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match parse_duration(value) {
        Ok(duration) if duration.is_zero() => Err(ConfigError::NotPositive {
            flag,
            value: value.to_string(),
        }),
        Ok(duration) => Ok(duration),
        Err(DurationError::Negative(_)) => Err(ConfigError::NotPositive {
            flag,
            value: value.to_string(),
        }),
        Err(source) => Err(ConfigError::InvalidDuration { flag, source }),
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let cleanup_period = positive_duration("cleanup-period", &args.cleanup_period)?;
        let cycle_timeout = positive_duration("cycle-timeout", &args.cycle_timeout)?;

        Ok(Self {
            cleanup_period,
            cycle_timeout,
            discovery: DiscoveryConfig {
                primary_socket: args.cri_socket.clone(),
                fallback_socket: args.fallback_socket.clone(),
                ..DiscoveryConfig::default()
            },
        })
    }
}

/// Parse a Go log level string into a log::Level.
/// Unknown levels fall back to Info.
fn parse_log_level(level: &str) -> log::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" | "warning" => log::Level::Warn,
        "error" | "critical" | "off" => log::Level::Error,
        _ => log::Level::Info,
    }
}

/// Log level to run with. Priority: DD_LOG_LEVEL > `--log-level`.
pub fn log_level(flag: &str) -> log::Level {
    match env::var("DD_LOG_LEVEL") {
        Ok(level) => parse_log_level(&level),
        Err(_) => parse_log_level(flag),
    }
}
