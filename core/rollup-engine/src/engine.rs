//! FILENAME: core/rollup-engine/src/engine.rs
//! Rollup Engine - Converts a row collection into a bucketed series.
//!
//! Algorithm:
//! 1. Project each row's timestamp; rows without one are skipped
//! 2. Key the row into its period bucket (day / ISO week / month)
//! 3. Feed every measure's accumulator for that bucket
//! 4. Emit one AggregatedPoint per period, ascending by period key
//!
//! AggregatedPoints are rebuilt from scratch on every call; nothing is
//! mutated in place across calls.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::{Bucket, MeasureKind, SeriesSpec};
use crate::keys::{bucket_key, week_sort_pair};
use crate::record::{field_number, field_text, field_timestamp, SourceRow};

// ============================================================================
// OUTPUT
// ============================================================================

/// One period of the series: the period key plus one value per measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPoint {
    /// Period key (`YYYY-MM-DD`, `YYYY-Www` or `YYYY-MM`).
    pub period: String,

    /// Measure key -> accumulated value.
    pub values: FxHashMap<String, f64>,
}

impl AggregatedPoint {
    /// Value for a measure key, 0.0 when the measure is unknown.
    pub fn value(&self, measure: &str) -> f64 {
        self.values.get(measure).copied().unwrap_or(0.0)
    }
}

// ============================================================================
// ACCUMULATION
// ============================================================================

/// Per-bucket accumulator state. The seen-id sets are scoped to the bucket:
/// they are created with it and dropped with it, so de-duplication never
/// crosses a period boundary.
struct BucketAccumulator {
    totals: SmallVec<[f64; 4]>,
    seen: SmallVec<[FxHashSet<String>; 4]>,
}

impl BucketAccumulator {
    fn new(measure_count: usize) -> Self {
        BucketAccumulator {
            totals: SmallVec::from_elem(0.0, measure_count),
            seen: SmallVec::from_elem(FxHashSet::default(), measure_count),
        }
    }
}

/// Rolls a row collection up into a bucketed series.
///
/// Rows with a missing or unparseable timestamp are silently excluded.
/// An empty collection yields an empty series. Sum measures treat a missing
/// numeric field as 0; distinct-count measures ignore rows without an id.
pub fn rollup(rows: &[SourceRow], bucket: Bucket, spec: &SeriesSpec) -> Vec<AggregatedPoint> {
    let mut buckets: FxHashMap<String, BucketAccumulator> = FxHashMap::default();

    for row in rows {
        let Some(ts) = field_timestamp(row, &spec.timestamp_field) else {
            continue;
        };
        let period = bucket_key(&ts, bucket);
        let acc = buckets
            .entry(period)
            .or_insert_with(|| BucketAccumulator::new(spec.measures.len()));

        for (i, measure) in spec.measures.iter().enumerate() {
            match measure.kind {
                MeasureKind::Sum => {
                    acc.totals[i] += field_number(row, &measure.field).unwrap_or(0.0);
                }
                MeasureKind::DistinctCount => {
                    if let Some(id) = field_text(row, &measure.field) {
                        if acc.seen[i].insert(id) {
                            acc.totals[i] += 1.0;
                        }
                    }
                }
            }
        }
    }

    let mut points: Vec<AggregatedPoint> = buckets
        .into_iter()
        .map(|(period, acc)| {
            let values = spec
                .measures
                .iter()
                .zip(acc.totals.iter())
                .map(|(m, total)| (m.key.clone(), *total))
                .collect();
            AggregatedPoint { period, values }
        })
        .collect();

    sort_points(&mut points, bucket);
    points
}

/// Ascending period order. Day and month keys are zero-padded so the string
/// order is already calendar order; week keys go through the (year, week)
/// pair.
fn sort_points(points: &mut [AggregatedPoint], bucket: Bucket) {
    match bucket {
        Bucket::Week => {
            points.sort_by(|a, b| week_sort_pair(&a.period).cmp(&week_sort_pair(&b.period)))
        }
        _ => points.sort_by(|a, b| a.period.cmp(&b.period)),
    }
}
