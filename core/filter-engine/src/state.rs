//! FILENAME: core/filter-engine/src/state.rs
//! Filter State - per-column accepted-value sets and their mutators.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalizes a raw value for matching: trims, and collapses every internal
/// whitespace run (including the non-breaking variants backend templating
/// tends to leave behind) to a single space. Matching stays case-sensitive
/// against the value as displayed.
pub fn normalize_value(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// COLUMN SPEC
// ============================================================================

/// A filterable column: its stable key, the row field it projects, and the
/// label shown on the filter chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    pub field: String,
    pub label: String,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, field: impl Into<String>, label: impl Into<String>) -> Self {
        ColumnSpec {
            key: key.into(),
            field: field.into(),
            label: label.into(),
        }
    }
}

// ============================================================================
// FILTER STATE
// ============================================================================

/// Multi-select filter state for one report tab.
///
/// Column key -> set of accepted normalized values. A column with no entry
/// (or an empty set) places no restriction on rows: the empty set is the
/// identity filter, not "reject everything".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    columns: Vec<ColumnSpec>,
    selected: FxHashMap<String, FxHashSet<String>>,
}

impl FilterState {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        FilterState {
            columns,
            selected: FxHashMap::default(),
        }
    }

    /// The columns this state was declared over.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Row field a column key projects, if the column is declared.
    pub fn column_field(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.key == column)
            .map(|c| c.field.as_str())
    }

    fn is_known(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.key == column)
    }

    /// Flips membership of `value` in the column's accepted set.
    /// Toggling an unknown column is a no-op, not an error.
    pub fn toggle(&mut self, column: &str, value: &str) {
        if !self.is_known(column) {
            return;
        }
        let normalized = normalize_value(value);
        let set = self.selected.entry(column.to_string()).or_default();
        if !set.remove(&normalized) {
            set.insert(normalized);
        }
        if set.is_empty() {
            self.selected.remove(column);
        }
    }

    /// Replaces the column's accepted set with the given values.
    pub fn set_all(&mut self, column: &str, values: &[String]) {
        if !self.is_known(column) {
            return;
        }
        let set: FxHashSet<String> = values.iter().map(|v| normalize_value(v)).collect();
        if set.is_empty() {
            self.selected.remove(column);
        } else {
            self.selected.insert(column.to_string(), set);
        }
    }

    /// Removes any restriction on the column.
    pub fn clear(&mut self, column: &str) {
        self.selected.remove(column);
    }

    /// Removes every restriction.
    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Accepted set for a column; None/empty means unrestricted.
    pub fn accepted(&self, column: &str) -> Option<&FxHashSet<String>> {
        self.selected.get(column)
    }

    /// Whether any column currently restricts rows.
    pub fn is_active(&self) -> bool {
        self.selected.values().any(|set| !set.is_empty())
    }

    /// Columns with a non-empty accepted set, paired with their row field.
    pub(crate) fn active_projections(&self) -> Vec<(&str, &FxHashSet<String>)> {
        self.columns
            .iter()
            .filter_map(|col| {
                let set = self.selected.get(&col.key)?;
                if set.is_empty() {
                    None
                } else {
                    Some((col.field.as_str(), set))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer_column() -> Vec<ColumnSpec> {
        vec![ColumnSpec::new("producers", "producers", "Producteur")]
    }

    #[test]
    fn normalize_collapses_nbsp_runs() {
        assert_eq!(normalize_value("  Ferme\u{a0}du  Lac "), "Ferme du Lac");
        assert_eq!(normalize_value("Rucher\u{202f}des Prés"), "Rucher des Prés");
        // Case is preserved: matching is exact against the displayed value.
        assert_eq!(normalize_value("GAEC des Vergers"), "GAEC des Vergers");
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = FilterState::new(producer_column());
        state.toggle("producers", "Ferme du Lac");
        assert!(state.accepted("producers").unwrap().contains("Ferme du Lac"));
        state.toggle("producers", "Ferme du Lac");
        assert!(state.accepted("producers").is_none());
        assert!(!state.is_active());
    }

    #[test]
    fn toggle_unknown_column_is_noop() {
        let mut state = FilterState::new(producer_column());
        state.toggle("warehouse", "Nord");
        assert!(!state.is_active());
        assert!(state.accepted("warehouse").is_none());
    }

    #[test]
    fn set_all_then_clear() {
        let mut state = FilterState::new(producer_column());
        state.set_all(
            "producers",
            &["Ferme du Lac".to_string(), "Rucher des Prés".to_string()],
        );
        assert_eq!(state.accepted("producers").unwrap().len(), 2);
        state.clear("producers");
        assert!(!state.is_active());
    }
}
