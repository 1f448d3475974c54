//! FILENAME: core/filter-engine/src/engine.rs
//! Filter Engine - row acceptance and cascading facet candidates.
//!
//! Acceptance contract: a row passes a column when the column is
//! unrestricted OR the row's own value set for that column intersects the
//! accepted set (disjunction within a row's values). Acceptance across
//! columns is a conjunction: the facets are independent.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use rollup_engine::record::{field_values, SourceRow};

use crate::state::{normalize_value, FilterState};

// ============================================================================
// ROW ACCEPTANCE
// ============================================================================

/// Whether a single row passes every active column filter.
pub fn row_accepted(row: &SourceRow, state: &FilterState) -> bool {
    state
        .active_projections()
        .into_iter()
        .all(|(field, accepted)| {
            field_values(row, field)
                .iter()
                .any(|value| accepted.contains(&normalize_value(value)))
        })
}

/// Indices of the rows passing the filter, in source order.
pub fn apply_indices(rows: &[SourceRow], state: &FilterState) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_accepted(row, state))
        .map(|(i, _)| i)
        .collect()
}

/// The accepted rows themselves, in source order.
pub fn apply(rows: &[SourceRow], state: &FilterState) -> Vec<SourceRow> {
    rows.iter()
        .filter(|row| row_accepted(row, state))
        .cloned()
        .collect()
}

// ============================================================================
// CASCADING FACETS
// ============================================================================

/// One candidate value for a column's dropdown, with the number of rows
/// currently offering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCandidate {
    pub value: String,
    pub count: usize,
}

/// Candidate values for `column`, computed from the rows that already pass
/// every OTHER column's filter. Call again whenever upstream filters or the
/// underlying rows change. Unknown columns yield an empty list.
pub fn facet_candidates(
    rows: &[SourceRow],
    state: &FilterState,
    column: &str,
) -> Vec<FacetCandidate> {
    let Some(field) = state.column_field(column) else {
        return Vec::new();
    };

    // Evaluate the other columns only: the column's own selection must not
    // narrow its candidate list.
    let mut others = state.clone();
    others.clear(column);

    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for row in rows {
        if !row_accepted(row, &others) {
            continue;
        }
        for value in field_values(row, field) {
            let normalized = normalize_value(&value);
            if normalized.is_empty() {
                continue;
            }
            *counts.entry(normalized).or_default() += 1;
        }
    }

    let mut candidates: Vec<FacetCandidate> = counts
        .into_iter()
        .map(|(value, count)| FacetCandidate { value, count })
        .collect();
    candidates.sort_by(|a, b| a.value.cmp(&b.value));
    candidates
}
