//! FILENAME: core/filter-engine/src/lib.rs
//! Per-column multi-select filters for the Terroir dashboards.
//!
//! Every report tab owns one FilterState. A column filter is a set of
//! accepted values over one field's distinct values; filters on different
//! columns combine as independent facets. The engine is pure: it never
//! touches the UI or the transport.
//!
//! Layers:
//! - `state`: FilterState, its mutators and value normalization
//! - `engine`: Row acceptance and cascading facet candidates

pub mod engine;
pub mod state;

pub use engine::{apply, apply_indices, facet_candidates, row_accepted, FacetCandidate};
pub use state::{normalize_value, ColumnSpec, FilterState};
