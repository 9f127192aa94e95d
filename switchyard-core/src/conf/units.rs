use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseUnitError {
    #[error("empty value")]
    Empty,

    #[error("invalid number in '{0}'")]
    InvalidNumber(String),

    #[error("missing unit in '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("value out of range")]
    OutOfRange,
}

/// Parses a duration like `"10s"`, `"1m30s"`, `"1.5h"` or `"250ms"`.
///
/// A bare `"0"` is the only value accepted without a unit.
pub fn parse_duration(input: &str) -> Result<Duration, ParseUnitError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseUnitError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut nanos = 0f64;
    let mut rest = s;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() {
            return Err(ParseUnitError::InvalidNumber(s.to_string()));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| ParseUnitError::InvalidNumber(s.to_string()))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let factor = match unit {
            "" => return Err(ParseUnitError::MissingUnit(s.to_string())),
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            other => return Err(ParseUnitError::UnknownUnit(other.to_string())),
        };

        nanos += value * factor;
        rest = tail;
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(ParseUnitError::OutOfRange);
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}

/// Parses a human readable byte size like `"64MiB"`, `"1 kB"` or `"512"`.
///
/// Every multiplier is decimal. An `i` after the prefix is accepted and
/// ignored, so `"64MiB"` and `"64MB"` are both 64,000,000 bytes.
pub fn parse_size(input: &str) -> Result<u64, ParseUnitError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseUnitError::Empty);
    }

    let number_len = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(number_len);
    if number.is_empty() {
        return Err(ParseUnitError::InvalidNumber(s.to_string()));
    }
    let value: f64 = number
        .parse()
        .map_err(|_| ParseUnitError::InvalidNumber(s.to_string()))?;

    let unit = unit.trim();
    let lower = unit.to_ascii_lowercase();
    let prefix = lower.strip_suffix('b').unwrap_or(&lower);
    let prefix = prefix.strip_suffix('i').filter(|p| !p.is_empty()).unwrap_or(prefix);

    let factor: f64 = match prefix {
        "" => 1.0,
        "k" => 1e3,
        "m" => 1e6,
        "g" => 1e9,
        "t" => 1e12,
        "p" => 1e15,
        _ => return Err(ParseUnitError::UnknownUnit(unit.to_string())),
    };

    let bytes = value * factor;
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(ParseUnitError::OutOfRange);
    }

    Ok(bytes.round() as u64)
}
