//! FILENAME: core/rollup-engine/src/definition.rs
//! Series Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a bucketed series.
//! These structures are designed to be:
//! - Serializable (per-tab projections live in static configuration)
//! - Immutable snapshots of what the chart for a tab aggregates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RollupError {
    #[error("unknown bucket granularity: {0:?}")]
    UnknownBucket(String),
}

// ============================================================================
// BUCKET GRANULARITY
// ============================================================================

/// Time granularity for series aggregation.
/// Selects the key function used to group rows into periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Day,
    Week,
    Month,
}

impl Bucket {
    /// Wire/query-string form of the granularity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Day => "day",
            Bucket::Week => "week",
            Bucket::Month => "month",
        }
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Bucket::Day
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = RollupError;

    /// Parses the wire form. Anything but "day" / "week" / "month" is an
    /// error for the caller to surface, never a panic.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Bucket::Day),
            "week" => Ok(Bucket::Week),
            "month" => Ok(Bucket::Month),
            other => Err(RollupError::UnknownBucket(other.to_string())),
        }
    }
}

// ============================================================================
// MEASURES
// ============================================================================

/// How a measure accumulates row values into its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureKind {
    /// Sum a numeric field across the rows of the bucket.
    Sum,
    /// Count distinct values of a field within the bucket.
    /// De-duplication is scoped to the bucket: the same id appearing in two
    /// different buckets counts once in each.
    DistinctCount,
}

/// One numeric accumulator of a series (e.g. "units", "revenue", "orders").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureSpec {
    /// Stable key the view layer looks the value up by.
    pub key: String,

    /// Source row field the measure reads.
    pub field: String,

    /// Accumulation mode.
    pub kind: MeasureKind,
}

impl MeasureSpec {
    pub fn sum(key: impl Into<String>, field: impl Into<String>) -> Self {
        MeasureSpec {
            key: key.into(),
            field: field.into(),
            kind: MeasureKind::Sum,
        }
    }

    pub fn distinct(key: impl Into<String>, field: impl Into<String>) -> Self {
        MeasureSpec {
            key: key.into(),
            field: field.into(),
            kind: MeasureKind::DistinctCount,
        }
    }
}

// ============================================================================
// SERIES SPEC
// ============================================================================

/// The per-tab projection driving a rollup: which field carries the row's
/// timestamp and which accumulators the series carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    /// Row field holding the timestamp.
    pub timestamp_field: String,

    /// Ordered accumulators; order is preserved in the output points.
    pub measures: Vec<MeasureSpec>,
}

impl SeriesSpec {
    pub fn new(timestamp_field: impl Into<String>, measures: Vec<MeasureSpec>) -> Self {
        SeriesSpec {
            timestamp_field: timestamp_field.into(),
            measures,
        }
    }
}
