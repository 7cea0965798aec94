//! Duration parsing for configuration values
//!
//! Accepts the forms used on the command line and in YAML files: `500ms`,
//! `30s`, `1m`, `2h`, and compounds such as `1m30s`.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

fn unit_millis(unit: &str) -> Option<u64> {
    match unit {
        "ms" => Some(1),
        "s" => Some(1_000),
        "m" => Some(60_000),
        "h" => Some(3_600_000),
        _ => None,
    }
}

/// Parse duration string (e.g., "30s", "1m30s", "500ms")
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration");
    }

    let mut total_ms: u64 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            anyhow::bail!("Invalid duration format: {}", s);
        }
        let (number, tail) = rest.split_at(digits);
        let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        if unit.is_empty() {
            anyhow::bail!("Missing unit in duration: {}", s);
        }
        let per_unit = unit_millis(unit)
            .with_context(|| format!("Unknown unit '{}' in duration: {}", unit, s))?;
        let value: u64 = number
            .parse()
            .with_context(|| format!("Invalid number in duration: {}", s))?;

        total_ms = value
            .checked_mul(per_unit)
            .and_then(|ms| total_ms.checked_add(ms))
            .with_context(|| format!("Duration out of range: {}", s))?;
        rest = next;
    }

    Ok(Duration::from_millis(total_ms))
}

/// Render a duration in the same short form `parse_duration` accepts
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis % 1000 != 0 {
        format!("{}ms", millis)
    } else {
        let secs = d.as_secs();
        if secs != 0 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs != 0 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Serde adapter for `Duration` fields written as "10s"
pub mod serde_duration {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
