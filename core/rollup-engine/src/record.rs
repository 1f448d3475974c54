//! FILENAME: core/rollup-engine/src/record.rs
//! Shared row model and field projection helpers.
//!
//! Analytics rows arrive as heterogeneous JSON objects whose shape differs
//! per tab. Rather than decoding each tab into its own struct, the engines
//! project fields out of the raw object on demand. The filter and report
//! engines reuse these helpers so every consumer reads a field the same way.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

/// A raw analytics row as returned by the backend.
pub type SourceRow = serde_json::Map<String, Value>;

// ============================================================================
// FIELD PROJECTIONS
// ============================================================================

/// Projects a numeric field. Numeric strings are accepted because several
/// backend serializers emit decimals as strings.
pub fn field_number(row: &SourceRow, field: &str) -> Option<f64> {
    match row.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Projects a field as display text. Missing and null fields yield None.
pub fn field_text(row: &SourceRow, field: &str) -> Option<String> {
    scalar_text(row.get(field)?)
}

/// Projects a field as the set of values the row carries for it.
/// A scalar yields one value; an array yields one per element (a row may
/// belong to several producer tags at once). Missing/null yields none.
pub fn field_values(row: &SourceRow, field: &str) -> Vec<String> {
    match row.get(field) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(value) => scalar_text(value).into_iter().collect(),
        None => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Parses a row's timestamp field into the viewer's local time zone.
///
/// Accepted forms, tried in order:
/// - RFC 3339 with offset (converted to local time)
/// - naive `YYYY-MM-DDTHH:MM:SS[.fff]` / `YYYY-MM-DD HH:MM:SS[.fff]`
///   (interpreted as local wall-clock time)
/// - bare `YYYY-MM-DD` (local midnight)
///
/// Returns None for missing or unparseable values; callers skip such rows.
pub fn field_timestamp(row: &SourceRow, field: &str) -> Option<DateTime<Local>> {
    let raw = match row.get(field)? {
        Value::String(s) => s.trim(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local_from_naive(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return local_from_naive(date.and_hms_opt(0, 0, 0)?);
    }

    None
}

/// Resolves a naive wall-clock time in the local zone. Ambiguous times (DST
/// fold) take the earlier instant; non-existent times (DST gap) yield None.
fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => None,
    }
}
