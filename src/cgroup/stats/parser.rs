//! Pure conversions from cgroup v1 pseudo-file text into typed values.
//!
//! Every parser here degrades instead of failing: unparsable text becomes
//! [`UNLIMITED`] (for scalars) or `None` (for lists). The `try_*` variants
//! expose the underlying [`StatParseError`] for callers that care about the
//! reason.
//!
//! Kernels do not have a dedicated "no limit" token in cgroup v1. They report
//! a page-aligned value close to `i64::MAX` instead, and values that do not fit
//! an `i64` at all are possible for some knobs. Both cases are folded into
//! [`UNLIMITED`] in two steps: overflow becomes [`OVERFLOW`] in
//! [`parse_long`], and [`unlimited_or_value`] turns anything above
//! [`UNLIMITED_MIN`] into [`UNLIMITED`].
//!
//! # Example
//!
//! ```rust
//! use cgroup_metrics::cgroup::stats::{parse_long, parse_range_list, unlimited_or_value, UNLIMITED};
//!
//! assert_eq!(unlimited_or_value(parse_long("9223372036854771712")), UNLIMITED);
//! assert_eq!(parse_range_list("0-2,4"), Some(vec![0, 1, 2, 4]));
//! ```

use crate::error::ResultOkLogExt;

use super::StatParseError;

/// Value reported for "no limit", for failed reads and for absent controllers.
pub const UNLIMITED: i64 = -1;

/// Parsed values strictly above this threshold are reported as [`UNLIMITED`].
pub const UNLIMITED_MIN: i64 = 0x7FFF_FFFF_FF00_0000;

/// Value substituted for decimal numbers that do not fit into an `i64`.
pub const OVERFLOW: i64 = i64::MAX;

/// Largest CPU or memory node id accepted in a range list. Well above the
/// kernel's `NR_CPUS` and `MAX_NUMNODES` limits.
pub const MAX_LIST_ID: u32 = 65_535;

/// Parses a trimmed decimal integer.
///
/// Digit-only input that overflows an `i64` yields [`OVERFLOW`].
///
/// # Errors
///
/// Returns [`StatParseError::InvalidValue`] for anything that is not a decimal
/// integer, including the empty string.
pub fn try_parse_long(text: &str) -> Result<i64, StatParseError> {
    let text = text.trim();
    match text.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(source) => {
            let digits = text.strip_prefix('+').unwrap_or(text);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                Ok(OVERFLOW)
            } else {
                Err(StatParseError::InvalidValue {
                    value: text.to_owned(),
                    source,
                })
            }
        }
    }
}

/// Parses a trimmed decimal integer, returning [`UNLIMITED`] on malformed input.
pub fn parse_long(text: &str) -> i64 {
    try_parse_long(text)
        .ok_log(log::Level::Trace)
        .unwrap_or(UNLIMITED)
}

/// Maps values above [`UNLIMITED_MIN`] to [`UNLIMITED`] and passes everything
/// else through unchanged.
#[inline]
pub fn unlimited_or_value(raw: i64) -> i64 {
    if raw > UNLIMITED_MIN { UNLIMITED } else { raw }
}

/// Parses a limit that is either a decimal number or the literal `max`
/// (as used by `pids.max`).
pub fn parse_limit(text: &str) -> i64 {
    match text.trim() {
        "max" => UNLIMITED,
        value => unlimited_or_value(parse_long(value)),
    }
}

/// Parses a trimmed floating point value, returning `UNLIMITED as f64` on
/// malformed input.
pub fn parse_double(text: &str) -> f64 {
    let text = text.trim();
    text.parse::<f64>()
        .map_err(|source| StatParseError::InvalidFloat {
            value: text.to_owned(),
            source,
        })
        .ok_log(log::Level::Trace)
        .unwrap_or(UNLIMITED as f64)
}

/// Looks up `key` in newline-delimited `key value` pairs, as found in
/// `cpu.stat`, `memory.stat` or `memory.oom_control`.
///
/// Only lines with exactly two whitespace-separated tokens are considered and
/// the first matching line wins. The value follows the [`parse_long`] rules.
/// Returns [`UNLIMITED`] if no line matches.
pub fn parse_keyed_long(text: &str, key: &str) -> i64 {
    text.lines()
        .find_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(value), None) if k == key => Some(value),
                _ => None,
            }
        })
        .map_or(UNLIMITED, parse_long)
}

/// Parses a comma-separated list of integers and inclusive `a-b` ranges,
/// e.g. the content of `cpuset.cpus`.
///
/// # Errors
///
/// Returns [`StatParseError::EmptyList`] for blank input and
/// [`StatParseError::InvalidRange`] for elements that are not a number, not a
/// well-formed ascending range, or above [`MAX_LIST_ID`].
pub fn try_parse_range_list(text: &str) -> Result<Vec<u32>, StatParseError> {
    let list = text.trim();
    if list.is_empty() {
        return Err(StatParseError::EmptyList);
    }

    let invalid = |value: &str| StatParseError::InvalidRange {
        value: value.to_owned(),
        list: list.to_owned(),
    };

    let parse_id = |id: &str, part: &str| match id.trim().parse::<u32>() {
        Ok(id) if id <= MAX_LIST_ID => Ok(id),
        _ => Err(invalid(part)),
    };

    let mut out = Vec::new();
    for part in list.split(',').map(str::trim) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_id(start, part)?;
                let end = parse_id(end, part)?;
                if end < start {
                    return Err(invalid(part));
                }
                out.extend(start..=end);
            }
            None => out.push(parse_id(part, part)?),
        }
    }

    Ok(out)
}

/// Parses a range list, returning `None` on blank or malformed input.
pub fn parse_range_list(text: &str) -> Option<Vec<u32>> {
    try_parse_range_list(text).ok_log(log::Level::Trace)
}

/// Parses whitespace-separated integers, e.g. `cpuacct.usage_percpu`.
///
/// # Errors
///
/// Returns [`StatParseError::EmptyList`] for blank input and
/// [`StatParseError::InvalidValue`] for the first token that does not parse.
pub fn try_parse_space_list(text: &str) -> Result<Vec<i64>, StatParseError> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|source| StatParseError::InvalidValue {
                    value: token.to_owned(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(StatParseError::EmptyList);
    }
    Ok(values)
}

/// Parses whitespace-separated integers, returning `None` on blank or
/// malformed input.
pub fn parse_space_list(text: &str) -> Option<Vec<i64>> {
    try_parse_space_list(text).ok_log(log::Level::Trace)
}
