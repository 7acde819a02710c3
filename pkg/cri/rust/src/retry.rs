// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Retry policy applied around every unary CRI call.
//!
//! Runtimes regularly answer with `Unavailable` while they restart or while the
//! socket is being recreated, so transient codes are retried with an
//! exponential backoff. Everything else is returned to the caller on the first
//! failure.

use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio::time::sleep;
use tonic::{Code, Status};

use crate::error::Error;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

const TRANSIENT_CODES: [Code; 4] = [
    Code::Unavailable,
    Code::Unknown,
    Code::ResourceExhausted,
    Code::DeadlineExceeded,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of calls, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub retryable_codes: Vec<Code>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            retryable_codes: TRANSIENT_CODES.to_vec(),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, code: Code) -> bool {
        self.retryable_codes.contains(&code)
    }

    /// Delay to wait before the given 0-based attempt.
    ///
    /// The first attempt goes out immediately, then the delay doubles starting
    /// from `base_delay`: 0, base, 2*base, 4*base, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `call` until it succeeds, fails with a non-retryable code, or the
    /// attempt budget is spent.
    ///
    /// `call` is invoked once per attempt and must build a fresh request each
    /// time.
    pub async fn call<T, F, Fut>(&self, method: &'static str, mut call: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Status>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let delay = self.backoff(attempt);
            if !delay.is_zero() {
                sleep(delay).await;
            }
            attempt += 1;

            let status = match call().await {
                Ok(response) => return Ok(response),
                Err(status) => status,
            };

            if !self.is_retryable(status.code()) || attempt >= max_attempts {
                return Err(Error::Rpc {
                    method,
                    attempts: attempt,
                    status: Box::new(status),
                });
            }

            debug!(
                "{method} attempt {attempt}/{max_attempts} failed with {:?}, retrying: {}",
                status.code(),
                status.message()
            );
        }
    }
}
