//! Normalization of loosely-typed query options.
//!
//! Every function here is total: malformed input falls back to a default and
//! never produces an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::config::QueryDefaults;
use crate::types::{LogLevel, LogOrder, NormalizedQueryOptions, RawQueryOptions};

/// Outer bound on distance from the epoch, in milliseconds.
///
/// chrono's representable range is narrower (roughly +8.21e15 / -8.33e15 ms,
/// years -262143 to 262142), so values between that range and this bound are
/// rejected by `DateTime::from_timestamp_millis` instead.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Naive date-time layouts accepted in addition to RFC 3339 and RFC 2822.
/// Values without an offset are read as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Interprets a value as a point in time.
///
/// Returns `None` for absent or falsy values (`null`, `false`, `0`, `""`) and
/// for anything that does not denote a valid instant. Numbers are milliseconds
/// since the Unix epoch and `true` counts as 1 ms. Numbers outside chrono's
/// range (about +8.21e15 / -8.33e15 ms) are `None`.
#[must_use]
pub fn validate_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            let millis = n.as_f64()?;
            if millis == 0.0 || !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
                return None;
            }
            DateTime::from_timestamp_millis(millis.trunc() as i64)
        }
        Value::Bool(true) => DateTime::from_timestamp_millis(1),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Coerces a value to a page size.
///
/// Accepts numbers, numeric strings (decimal, exponent, or `0x`/`0o`/`0b`
/// prefixed) and booleans. Fractions are truncated. Returns `None` when the
/// result is not a positive count, which callers treat as "use the default".
#[must_use]
pub fn coerce_size(value: Option<&Value>) -> Option<usize> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_numeric_str(s)?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };

    if !n.is_finite() || n < 1.0 {
        return None;
    }
    Some(n.trunc() as usize)
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let s = s.trim();
    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| s.strip_prefix(prefix).map(|digits| (digits, radix)));

    if let Some((digits, radix)) = radix {
        return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }
    // Rust accepts spellings like "inf" and "NaN"; those are rejected later by
    // the finiteness check.
    s.parse::<f64>().ok()
}

/// Returns the string form of a present, non-falsy value.
fn present_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Normalizes raw options using the documented defaults.
///
/// See [`normalize_options_with`].
#[must_use]
pub fn normalize_options(raw: &RawQueryOptions, now: DateTime<Utc>) -> NormalizedQueryOptions {
    normalize_options_with(raw, now, &QueryDefaults::default())
}

/// Normalizes raw options, substituting `defaults` for missing or malformed
/// fields.
///
/// `level` and `order` are only defaulted when absent; unrecognized strings are
/// passed through as-is. No ordering between `from` and `until` is enforced.
#[must_use]
pub fn normalize_options_with(
    raw: &RawQueryOptions,
    now: DateTime<Utc>,
    defaults: &QueryDefaults,
) -> NormalizedQueryOptions {
    let from = validate_timestamp(raw.from.as_ref())
        .unwrap_or_else(|| default_window_start(now, defaults));
    let until = validate_timestamp(raw.until.as_ref()).unwrap_or(now);
    let size = coerce_size(raw.size.as_ref()).unwrap_or_else(|| defaults.effective_size());
    let order = present_string(raw.order.as_ref())
        .map_or_else(|| defaults.order.clone(), LogOrder::from);
    let level = present_string(raw.level.as_ref())
        .map_or_else(|| defaults.level.clone(), LogLevel::from);

    NormalizedQueryOptions {
        level,
        from,
        until,
        order,
        size,
    }
}

/// Start of the default window, clamped to the earliest representable instant.
fn default_window_start(now: DateTime<Utc>, defaults: &QueryDefaults) -> DateTime<Utc> {
    now.checked_sub_signed(defaults.effective_lookback())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
