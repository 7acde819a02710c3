// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Parsing of Go-style duration strings (`1h`, `90s`, `1h30m`, `1.5h`,
//! `250ms`), the format the agent's flags have always accepted.

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} is out of range")]
    Overflow(String),
    #[error("duration {0:?} is negative")]
    Negative(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse a duration such as `"1h30m"`. A bare `"0"` is accepted without a
/// unit. Negative durations are rejected, except for `-0`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Invalid(input.to_string()));
    }

    let mut total: u128 = 0;
    let mut chars = rest.chars().peekable();
    while chars.peek().is_some() {
        let mut whole = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            whole.push(c);
        }
        let mut fraction = String::new();
        if chars.next_if_eq(&'.').is_some() {
            while let Some(c) = chars.next_if(char::is_ascii_digit) {
                fraction.push(c);
            }
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationError::Invalid(input.to_string()));
        }

        let mut unit = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_ascii_digit() && *c != '.') {
            unit.push(c);
        }
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(&unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.clone(),
            input: input.to_string(),
        })?;

        let overflow = || DurationError::Overflow(input.to_string());
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        // Digits past nanosecond precision are dropped.
        let mut digit_scale = scale;
        for digit in fraction.chars().filter_map(|c| c.to_digit(10)) {
            digit_scale /= 10;
            if digit_scale == 0 {
                break;
            }
            nanos += u128::from(digit) * digit_scale;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
    }

    if negative && total > 0 {
        return Err(DurationError::Negative(input.to_string()));
    }

    // Go durations are bounded by i64 nanoseconds.
    let nanos = i64::try_from(total).map_err(|_| DurationError::Overflow(input.to_string()))?;
    Ok(Duration::from_nanos(nanos.unsigned_abs()))
}
